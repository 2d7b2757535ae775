mod game;
use game::HelloWindow;

strata_native::native_main!(HelloWindow, "hello-window");
