//! Mix presets - relative levels for music, binaural tone and voice

/// Named balance between the three audio paths, in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixPreset {
    pub name: &'static str,
    pub music: u8,
    pub binaural: u8,
    pub voice: u8,
}

impl MixPreset {
    /// Percent to a 0.0 - 1.0 level
    pub fn level(percent: u8) -> f32 {
        f32::from(percent.min(100)) / 100.0
    }
}

pub const MIX_PRESETS: [MixPreset; 3] = [
    MixPreset {
        name: "Meditation",
        music: 60,
        binaural: 30,
        voice: 100,
    },
    MixPreset {
        name: "Deep Sleep",
        music: 40,
        binaural: 50,
        voice: 0,
    },
    MixPreset {
        name: "Affirmation",
        music: 40,
        binaural: 30,
        voice: 100,
    },
];

/// Find a preset by name, ignoring case and separators
pub fn mix_preset(name: &str) -> Option<&'static MixPreset> {
    let wanted = squash(name);
    MIX_PRESETS.iter().find(|p| squash(p.name) == wanted)
}

fn squash(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
