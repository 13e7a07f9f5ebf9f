//! Static emergency hotline panel shown when a reply is flagged urgent.

pub const EMERGENCY_HEADER: &str = "🚨 EMERGENCY DETECTED 🚨";
pub const EMERGENCY_INSTRUCTION: &str = "Call emergency services immediately:";
pub const EMERGENCY_NOTE: &str = "⚠️ Dial any number above immediately";

/// A hotline rendered verbatim in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotline {
    pub icon: &'static str,
    pub number: &'static str,
    pub label: &'static str,
}

impl Hotline {
    /// `tel:` URI for terminals and desktops that can hand it to a dialer.
    pub fn tel_uri(&self) -> String {
        format!("tel:{}", self.number)
    }
}

pub const HOTLINES: [Hotline; 4] = [
    Hotline {
        icon: "📞",
        number: "911",
        label: "Emergency Hotline",
    },
    Hotline {
        icon: "🏥",
        number: "117",
        label: "Philippine Red Cross",
    },
    Hotline {
        icon: "💬",
        number: "143",
        label: "DOH Health Line",
    },
    Hotline {
        icon: "🚑",
        number: "8527-7700",
        label: "Metro Manila ERUF",
    },
];
