// Pitch name <-> MIDI key conversions.
//
// The tokenizer emits symbolic pitch names for single notes ("C4", "F#3");
// the MIDI writer parses them back. Names use sharps; the parser also accepts
// 'b' flats so hand-written tokens work. Octaves follow the MIDI convention
// where C4 = key 60, so key 0 is "C-1".

/// Names of the twelve pitch classes, sharps only.
const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Render a MIDI key number as a pitch name with octave, e.g. 60 -> "C4".
pub fn pitch_name(key: u8) -> String {
    let octave = (key / 12) as i8 - 1;
    format!("{}{}", PITCH_CLASS_NAMES[(key % 12) as usize], octave)
}

/// Parse a pitch name back to a MIDI key number.
///
/// Accepts a letter A-G, any number of '#' (sharp) or 'b' (flat) accidentals,
/// and a (possibly negative) octave. Returns None for anything else or for
/// pitches outside the 0..=127 MIDI range.
pub fn parse_pitch_name(name: &str) -> Option<u8> {
    let mut chars = name.chars().peekable();

    let letter = chars.next()?;
    let mut pc: i32 = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    while let Some(&c) = chars.peek() {
        match c {
            '#' => {
                pc += 1;
                chars.next();
            }
            'b' => {
                pc -= 1;
                chars.next();
            }
            _ => break,
        }
    }

    let octave: i32 = chars.collect::<String>().parse().ok()?;
    let key = (octave + 1) * 12 + pc;
    u8::try_from(key).ok().filter(|&k| k <= 127)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_name_basic() {
        assert_eq!(pitch_name(60), "C4");
        assert_eq!(pitch_name(61), "C#4");
        assert_eq!(pitch_name(69), "A4");
        assert_eq!(pitch_name(0), "C-1");
        assert_eq!(pitch_name(127), "G9");
    }

    #[test]
    fn test_parse_pitch_name() {
        assert_eq!(parse_pitch_name("C4"), Some(60));
        assert_eq!(parse_pitch_name("C#4"), Some(61));
        assert_eq!(parse_pitch_name("Db4"), Some(61));
        assert_eq!(parse_pitch_name("A4"), Some(69));
        assert_eq!(parse_pitch_name("C-1"), Some(0));
        assert_eq!(parse_pitch_name("G9"), Some(127));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_pitch_name(""), None);
        assert_eq!(parse_pitch_name("H4"), None);
        assert_eq!(parse_pitch_name("C"), None);
        assert_eq!(parse_pitch_name("C#"), None);
        // Above the MIDI range (G#9 = 128).
        assert_eq!(parse_pitch_name("G#9"), None);
    }

    #[test]
    fn test_name_parse_roundtrip() {
        for key in 0..=127u8 {
            assert_eq!(parse_pitch_name(&pitch_name(key)), Some(key));
        }
    }
}
