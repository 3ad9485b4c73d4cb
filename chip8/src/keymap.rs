use sdl2::keyboard::Keycode;

/// Chip-8 input is generated with a hexadecimal keypad, laid out here on the left four
/// columns of a QWERTY keyboard.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
/// Indexed by keypad key.
const KEYBOARD: [Keycode; 16] = [
    Keycode::X,
    Keycode::Num1,
    Keycode::Num2,
    Keycode::Num3,
    Keycode::Q,
    Keycode::W,
    Keycode::E,
    Keycode::A,
    Keycode::S,
    Keycode::D,
    Keycode::Z,
    Keycode::C,
    Keycode::Num4,
    Keycode::R,
    Keycode::F,
    Keycode::V,
];

/// The keypad key a keyboard key stands in for, if any
pub fn keymap(key: Keycode) -> Option<u8> {
    KEYBOARD
        .iter()
        .position(|&mapped| mapped == key)
        .map(|index| index as u8)
}
