mod game;
use game::FlyCameraDemo;

strata_native::native_main!(FlyCameraDemo, "fly-camera");
