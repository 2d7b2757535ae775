mod game;
use game::PhysicsCamera;

strata_native::native_main!(PhysicsCamera, "physics-camera");
