use museum_input::ControlKey;
use winit::keyboard::KeyCode;

/// Physical key driving each camera control.
pub const BINDINGS: [(KeyCode, ControlKey); 8] = [
    (KeyCode::KeyW, ControlKey::LookUp),
    (KeyCode::KeyS, ControlKey::LookDown),
    (KeyCode::KeyA, ControlKey::TurnLeft),
    (KeyCode::KeyD, ControlKey::TurnRight),
    (KeyCode::ArrowUp, ControlKey::Forward),
    (KeyCode::ArrowDown, ControlKey::Backward),
    (KeyCode::ArrowRight, ControlKey::StrafeRight),
    (KeyCode::ArrowLeft, ControlKey::StrafeLeft),
];

/// Key that ends the render loop.
pub const EXIT_KEY: KeyCode = KeyCode::Escape;

pub fn control_for(key: KeyCode) -> Option<ControlKey> {
    BINDINGS
        .iter()
        .find(|(code, _)| *code == key)
        .map(|(_, control)| *control)
}
