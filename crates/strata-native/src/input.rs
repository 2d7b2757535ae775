use macroquad::input::{
    is_key_pressed, is_key_released, is_mouse_button_pressed, is_mouse_button_released,
    mouse_position, mouse_wheel, KeyCode,
};
use macroquad::input::MouseButton as MqButton;
use strata_engine::{InputEvent, InputQueue, Key, MouseButton};

fn key_code(key: Key) -> KeyCode {
    match key {
        Key::W => KeyCode::W,
        Key::A => KeyCode::A,
        Key::S => KeyCode::S,
        Key::D => KeyCode::D,
        Key::Q => KeyCode::Q,
        Key::E => KeyCode::E,
        Key::R => KeyCode::R,
        Key::Space => KeyCode::Space,
        Key::LeftShift => KeyCode::LeftShift,
        Key::LeftControl => KeyCode::LeftControl,
        Key::Escape => KeyCode::Escape,
        Key::Tab => KeyCode::Tab,
        Key::One => KeyCode::Key1,
        Key::Two => KeyCode::Key2,
        Key::Three => KeyCode::Key3,
        Key::F1 => KeyCode::F1,
    }
}

fn mouse_button(button: MouseButton) -> MqButton {
    match button {
        MouseButton::Left => MqButton::Left,
        MouseButton::Right => MqButton::Right,
        MouseButton::Middle => MqButton::Middle,
    }
}

/// Sample this frame's macroquad input as engine events.
pub fn sample_input(queue: &mut InputQueue) {
    for key in Key::ALL {
        let code = key_code(key);
        if is_key_pressed(code) {
            queue.push(InputEvent::KeyDown(key));
        }
        if is_key_released(code) {
            queue.push(InputEvent::KeyUp(key));
        }
    }

    let (x, y) = mouse_position();
    queue.push(InputEvent::MouseMove { x, y });

    for button in MouseButton::ALL {
        let mq = mouse_button(button);
        if is_mouse_button_pressed(mq) {
            queue.push(InputEvent::MouseDown(button));
        }
        if is_mouse_button_released(mq) {
            queue.push(InputEvent::MouseUp(button));
        }
    }

    // One notch per event, whatever unit the platform reports in.
    let (_, wheel) = mouse_wheel();
    if wheel != 0.0 {
        queue.push(InputEvent::Wheel(wheel.signum()));
    }
}
