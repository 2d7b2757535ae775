use strata_engine::*;

const MESSAGE: &str = "Congrats! You created your first strata window!";

/// Singleton: everything the test window edits.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub open: bool,
    pub value: f32,
    pub clear_color: [f32; 3],
    pub clicks: u32,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            open: true,
            value: 0.0,
            clear_color: [0.45, 0.55, 0.60],
            clicks: 0,
        }
    }
}

/// The whole frame, GUI included, from one system in `OnUpdate`.
pub fn gui_panel_system(ctx: &mut SystemContext<'_>) {
    let show_fps = ctx.singleton::<GameConfig>().map(|c| c.show_fps).unwrap_or(true);
    let (Some(input), Some(mut gui), Some(mut list), Some(mut panel)) = (
        ctx.singleton::<InputState>(),
        ctx.singleton_mut::<Gui>(),
        ctx.singleton_mut::<DrawList>(),
        ctx.singleton_mut::<PanelState>(),
    ) else {
        log::trace!("{}: missing singletons, skip", ctx.name());
        return;
    };
    let panel = &mut *panel;

    list.begin_drawing();
    list.push(DrawCommand::Clear(Color::from_f32(panel.clear_color)));
    list.text(MESSAGE, 40.0, 200.0, 20.0, Color::DARKGRAY);

    gui.begin_frame(&input);
    gui.window("Test Window", &mut panel.open, |ui| {
        ui.text("Test Text.");
        ui.slider_f32("float", &mut panel.value, 0.0, 1.0);
        ui.color_edit3("clear color", &mut panel.clear_color);
        if ui.button("Button") {
            log::info!("Click");
            panel.clicks += 1;
        }
    });
    list.extend(gui.end_frame());

    if show_fps {
        list.fps(10.0, 10.0);
    }
    list.end_drawing();
}

pub struct GuiPanel;

impl GuiPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Game for GuiPanel {
    fn config(&self) -> GameConfig {
        GameConfig::default()
            .with_title("strata - GUI panel")
            .with_window_size(800, 450)
    }

    fn init(&mut self, world: &mut World) -> Result<()> {
        world.set(PanelState::default());
        world.add_system("gui_panel_system", PhaseId::ON_UPDATE, gui_panel_system)
    }
}
