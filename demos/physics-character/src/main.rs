mod game;
use game::PhysicsCharacter;

strata_native::native_main!(PhysicsCharacter, "physics-character");
