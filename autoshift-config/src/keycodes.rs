use std::collections::HashMap;

use autoshift_common::keycodes::key_range;
use lazy_static::lazy_static;

const DASH_USCORE: [char; 2] = ['_', '-'];

/// Names of the 5 bit modifier encoding; `R` prefixed names select the right hand.
const MODIFIER_BITS: [&str; 4] = ["C", "S", "A", "G"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeycodeListing {
    pub name: &'static str,
    pub code: u16,
}

lazy_static! {
    static ref LISTING: Vec<KeycodeListing> = {
        let mut v = Vec::new();
        let mut add = |names: &'static str, code: u16| {
            for name in names.split('/') {
                v.push(KeycodeListing { name, code });
            }
        };
        for (i, names) in r#"
A B C D E F G H I J K L M N O P Q R S T U V W X Y Z
1 2 3 4 5 6 7 8 9 0
Return/Enter/ent
Escape/esc
backspace/bksp
Tab
Spacebar/space/spc
Dash/-/minus
Equals/=/equal
LeftBrace/[/leftsquarebracket
RightBrace/]/rightsquarebracket
Backslash/\
NonUsHash
Semicolon/;
LeftApos/'/apostrophe
GraveAccent/`/grave
Comma/,
Period/./dot
Forwardslash/slash
CapsLock
F1 F2 F3 F4 F5 F6 F7 F8 F9 F10 F11 F12
Printscreen/print
ScrollLock
Pause
Insert
Home Pageup/pgup Delete/del End Pagedown/pgdn
Right Left Down Up
KpNumLock
KpForwardslash KpStar KpDash KpPlus KpEnter
Kp1 Kp2 Kp3 Kp4 Kp5 Kp6 Kp7 Kp8 Kp9 Kp0
KpPeriod
NonUsBackslash
Application/app
"#
        .split_whitespace()
        .enumerate()
        {
            add(names, (i + 4) as u16);
        }

        for (i, names) in r#"
Leftcontrol/lctrl/lc/lctl
Leftshift/lshift/ls
Leftalt/lalt/la
LeftGui/leftmeta/lgui/lg
Rightcontrol/rctrl/rc/rctl
Rightshift/rshift/rs
Rightalt/altgr/ralt/ra
RightGui/rightmeta/rgui/rg
"#
        .split_whitespace()
        .enumerate()
        {
            add(names, key_range::MODIFIER_MIN + i as u16);
        }

        add("noop", key_range::NONE);
        add("AS_Down/asdn", key_range::AS_DOWN);
        add("AS_Up", key_range::AS_UP);
        add("AS_Report/asrp", key_range::AS_REPORT);
        add("AS_On", key_range::AS_ON);
        add("AS_Off", key_range::AS_OFF);
        add("AS_Toggle/astg", key_range::AS_TOGGLE);
        // `/` is the alias separator above
        v.push(KeycodeListing {
            name: "/",
            code: key_range::BASIC_SLASH,
        });
        v
    };
    static ref KEY_NAMES: HashMap<String, u16> = {
        let mut m = HashMap::new();
        for l in LISTING.iter() {
            let k = normalize(l.name);
            let k = if k.is_empty() { l.name.to_string() } else { k };
            if m.insert(k, l.code).is_some() {
                panic!("key already added {}", l.name);
            }
        }
        m
    };
}

fn normalize(name: &str) -> String {
    name.replace(DASH_USCORE, "").to_lowercase()
}

/// Every key mnemonic and its code, aliases included.
pub fn keycodes_iter() -> impl Iterator<Item = KeycodeListing> {
    LISTING.iter().copied()
}

/// Look up a plain key mnemonic. Case, `-` and `_` are ignored except for names made only of
/// punctuation. A leading `\` escapes the rest of the name.
pub fn key_code(name: &str) -> Option<u16> {
    let name = if name.len() > 1 && name.starts_with('\\') {
        &name[1..]
    } else {
        name
    };
    if let Some(code) = KEY_NAMES.get(name) {
        return Some(*code);
    }
    let k = normalize(name);
    if k.is_empty() {
        None
    } else {
        KEY_NAMES.get(k.as_str()).copied()
    }
}

/// Convert `C-S` style modifier names to the 5 bit encoding used by mod-tap and composite keys.
/// Left and right hand modifiers may not be mixed.
pub fn modifiers_to_mods5(text: &str) -> Option<u8> {
    let mut bits = 0;
    let mut hand = None;
    for s in text.split('-') {
        let (right, s) = match s.strip_prefix('R') {
            Some(rest) if !rest.is_empty() => (true, rest),
            _ => (false, s),
        };
        let i = MODIFIER_BITS.iter().position(|m| *m == s)?;
        if *hand.get_or_insert(right) != right {
            return None;
        }
        bits |= 1 << i;
    }
    match hand {
        Some(true) => Some(bits | 0x10),
        Some(false) => Some(bits),
        None => None,
    }
}

pub fn mods5_to_string(mods5: u8) -> String {
    let prefix = if mods5 & 0x10 == 0 { "" } else { "R" };
    MODIFIER_BITS
        .iter()
        .enumerate()
        .filter(|(i, _)| mods5 & (1 << i) != 0)
        .map(|(_, m)| format!("{prefix}{m}"))
        .collect::<Vec<_>>()
        .join("-")
}

fn basic_code(name: &str) -> Result<u8, String> {
    match key_code(name.trim()) {
        Some(code) if key_range::is_basic(code) && !key_range::is_modifier(code) => Ok(code as u8),
        _ => Err(format!("'{}' is not a basic key", name.trim())),
    }
}

/// Parse any keycode expression:
///
/// - a mnemonic: `a`, `enter`, `as_toggle`
/// - a hex code: `0x4104`
/// - a composite key: `S-1`, `C-S-a`
/// - a layer-tap key: `lt(1, a)`
/// - a mod-tap key: `mt(C-S, a)`
pub fn parse_keycode(text: &str) -> Result<u16, String> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x") {
        return u16::from_str_radix(hex, 16).map_err(|_| format!("Invalid hex keycode '{text}'"));
    }
    if let Some(code) = key_code(text) {
        return Ok(code);
    }
    if let Some(args) = text.strip_suffix(')') {
        if let Some((func, args)) = args.split_once('(') {
            let (a, b) = args
                .split_once(',')
                .ok_or_else(|| format!("{}(...) takes two arguments", func.trim()))?;
            return match func.trim() {
                "lt" => {
                    let layer = a
                        .trim()
                        .parse::<u8>()
                        .ok()
                        .filter(|l| *l < 16)
                        .ok_or_else(|| format!("Invalid layer '{}'; use 0 to 15", a.trim()))?;
                    Ok(key_range::layer_tap(layer, basic_code(b)?))
                }
                "mt" => {
                    let mods = modifiers_to_mods5(a.trim())
                        .ok_or_else(|| format!("Invalid modifiers '{}'", a.trim()))?;
                    Ok(key_range::mod_tap(mods, basic_code(b)?))
                }
                f => Err(format!("Unknown function '{f}'")),
            };
        }
    }
    if let Some((mods, key)) = text.rsplit_once('-') {
        if let Some(mods) = modifiers_to_mods5(mods) {
            return Ok(key_range::composite(mods, basic_code(key)?));
        }
    }
    Err(format!("Unknown keycode '{text}'"))
}

/// Describe a keycode the way [parse_keycode] reads it.
pub fn keycode_to_string(code: u16) -> String {
    let name = |c: u16| {
        keycodes_iter()
            .find(|l| l.code == c)
            .map_or_else(|| format!("0x{c:02x}"), |l| l.name.to_string())
    };
    let base = key_range::base_code(code) as u16;
    let mods5 = ((code >> 8) & 0x1f) as u8;
    if key_range::is_layer_tap(code) {
        format!("lt({}, {})", (code >> 8) & 0xf, name(base))
    } else if key_range::is_mod_tap(code) {
        format!("mt({}, {})", mods5_to_string(mods5), name(base))
    } else if key_range::is_composite(code) {
        format!("{}-{}", mods5_to_string(mods5), name(base))
    } else {
        name(code)
    }
}

#[cfg(test)]
#[path = "keycodes_test.rs"]
mod test;
