mod game;
use game::GuiPanel;

strata_native::native_main!(GuiPanel, "gui-panel");
