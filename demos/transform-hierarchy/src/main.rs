mod game;
use game::TransformHierarchy;

strata_native::native_main!(TransformHierarchy, "transform-hierarchy");
