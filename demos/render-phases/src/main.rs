mod game;
use game::RenderPhasesDemo;

strata_native::native_main!(RenderPhasesDemo, "render-phases");
