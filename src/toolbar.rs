use crate::scene::{AnimationPlayer, TransformParameters};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    TruckScale,
    RampHeightScale,
    AmbientRed,
    AmbientGreen,
    AmbientBlue,
}

impl Field {
    const ALL: [Field; 5] = [
        Field::TruckScale,
        Field::RampHeightScale,
        Field::AmbientRed,
        Field::AmbientGreen,
        Field::AmbientBlue,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::TruckScale => "Truck scale",
            Field::RampHeightScale => "Ramp height scale",
            Field::AmbientRed => "Reflector red",
            Field::AmbientGreen => "Reflector green",
            Field::AmbientBlue => "Reflector blue",
        }
    }

    /// Parses `text` and hands it to the matching setter. Text that is not
    /// a number is dropped and the parameter keeps its value.
    pub fn apply(self, text: &str, params: &mut TransformParameters) {
        let Ok(value) = text.trim().parse::<f32>() else {
            return;
        };

        match self {
            Field::TruckScale => params.set_truck_scale(value),
            Field::RampHeightScale => params.set_ramp_height_scale(value),
            Field::AmbientRed => params.set_ambient_red(value),
            Field::AmbientGreen => params.set_ambient_green(value),
            Field::AmbientBlue => params.set_ambient_blue(value),
        }
    }

    fn current(self, params: &TransformParameters) -> f32 {
        match self {
            Field::TruckScale => params.truck_scale(),
            Field::RampHeightScale => params.ramp_height_scale(),
            Field::AmbientRed => params.ambient_color().x,
            Field::AmbientGreen => params.ambient_color().y,
            Field::AmbientBlue => params.ambient_color().z,
        }
    }
}

/// Text boxes bound to the user-editable parameters.
pub struct Toolbar {
    texts: [String; 5],
}

impl Toolbar {
    pub fn from_params(params: &TransformParameters) -> Self {
        Self {
            texts: Field::ALL.map(|field| field.current(params).to_string()),
        }
    }

    #[cfg(test)]
    fn text(&self, field: Field) -> &str {
        &self.texts[field as usize]
    }

    pub fn set_text(&mut self, field: Field, text: impl Into<String>, player: &AnimationPlayer) {
        let text = text.into();
        player.update_params(|params| field.apply(&text, params));
        self.texts[field as usize] = text;
    }

    pub fn draw(&mut self, ui: &imgui::Ui, player: &AnimationPlayer) {
        ui.window("Scene")
            .position([10.0, 10.0], imgui::Condition::FirstUseEver)
            .always_auto_resize(true)
            .collapsible(false)
            .build(|| {
                for field in Field::ALL {
                    let text = &mut self.texts[field as usize];
                    if ui.input_text(field.label(), text).build() {
                        player.update_params(|params| field.apply(text.as_str(), params));
                    }
                }
                ui.separator();
                ui.text("P: play animation  Q: quit");
            });
    }
}
