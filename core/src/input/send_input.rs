//! Windows key injection through `SendInput`.

use cs3split_types::SkipKey;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    INPUT, INPUT_0, INPUT_KEYBOARD, KEYBD_EVENT_FLAGS, KEYBDINPUT, KEYEVENTF_KEYUP, SendInput,
    VIRTUAL_KEY, VK_ESCAPE, VK_RETURN, VK_SPACE,
};

use super::KeyPresser;
use crate::error::InputError;

#[derive(Debug, Default)]
pub struct SendInputPresser;

fn virtual_key(key: SkipKey) -> VIRTUAL_KEY {
    match key {
        SkipKey::Space => VK_SPACE,
        SkipKey::Enter => VK_RETURN,
        SkipKey::Escape => VK_ESCAPE,
    }
}

fn send_key(key: SkipKey, flags: KEYBD_EVENT_FLAGS) -> Result<(), InputError> {
    let input = INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: virtual_key(key),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };

    // SAFETY: `input` is a fully initialized keyboard INPUT and the size matches.
    let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
    if sent != 1 {
        return Err(InputError::Injection { sent, expected: 1 });
    }
    Ok(())
}

impl KeyPresser for SendInputPresser {
    fn key_down(&self, key: SkipKey) -> Result<(), InputError> {
        send_key(key, KEYBD_EVENT_FLAGS(0))
    }

    fn key_up(&self, key: SkipKey) -> Result<(), InputError> {
        send_key(key, KEYEVENTF_KEYUP)
    }
}
