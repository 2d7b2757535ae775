mod game;
use game::PlayerCubes;

strata_native::native_main!(PlayerCubes, "player-cubes");
