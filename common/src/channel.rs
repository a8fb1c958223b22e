//! Telemetry channel identifiers and channel sets.
//!
//! A [`Channel`] names one quantity in a frame. [`ChannelSet`] is a bitmask
//! over channels, returned by merges so callers can tell which values moved
//! without comparing whole states.

/// One named telemetry quantity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Channel {
    Speed,
    Rpm,
    Coolant,
    Oil,
    Fuel,
    Voltage,
    Boost,
    OilPress,
    UartConnected,
    Time,
}

impl Channel {
    /// All channels, in bit order.
    pub const ALL: [Self; 10] = [
        Self::Speed,
        Self::Rpm,
        Self::Coolant,
        Self::Oil,
        Self::Fuel,
        Self::Voltage,
        Self::Boost,
        Self::OilPress,
        Self::UartConnected,
        Self::Time,
    ];

    /// The six auxiliary analog channels, left column then right column.
    pub const AUXILIARY: [Self; 6] = [
        Self::Coolant,
        Self::Oil,
        Self::Fuel,
        Self::Voltage,
        Self::Boost,
        Self::OilPress,
    ];

    /// Frame key for this channel.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Speed => "SPEED",
            Self::Rpm => "RPM",
            Self::Coolant => "COOLANT",
            Self::Oil => "OIL",
            Self::Fuel => "FUEL",
            Self::Voltage => "VOLTAGE",
            Self::Boost => "BOOST",
            Self::OilPress => "OILPRESS",
            Self::UartConnected => "UART_CONNECTED",
            Self::Time => "TIME",
        }
    }

    /// Short label shown under gauges and in the side chrome.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Speed => "SPEED",
            Self::Rpm => "RPM",
            Self::Coolant => "COOLANT",
            Self::Oil => "OIL TEMP",
            Self::Fuel => "FUEL",
            Self::Voltage => "BATTERY",
            Self::Boost => "BOOST",
            Self::OilPress => "OIL PRESS",
            Self::UartConnected => "LINK",
            Self::Time => "TIME",
        }
    }

    #[inline]
    const fn bit(self) -> u16 { 1 << self as u16 }
}

/// Bitmask of channels.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct ChannelSet(u16);

impl ChannelSet {
    pub const EMPTY: Self = Self(0);

    /// Channels whose values drive the needle and RPM arc.
    pub const PRIMARY: Self = Self(Channel::Speed.bit() | Channel::Rpm.bit());

    /// Channels drawn on the gauge surface (primary gauge plus aux rings).
    pub const SURFACE: Self = Self(
        Self::PRIMARY.0
            | Channel::Coolant.bit()
            | Channel::Oil.bit()
            | Channel::Fuel.bit()
            | Channel::Voltage.bit()
            | Channel::Boost.bit()
            | Channel::OilPress.bit(),
    );

    /// Channels the simulation override can take over.
    pub const SIMULATED: Self = Self(Channel::Speed.bit() | Channel::Rpm.bit() | Channel::Coolant.bit());

    #[inline]
    pub const fn contains(
        self,
        channel: Channel,
    ) -> bool {
        self.0 & channel.bit() != 0
    }

    #[inline]
    pub const fn insert(
        &mut self,
        channel: Channel,
    ) {
        self.0 |= channel.bit();
    }

    #[inline]
    pub const fn union(
        self,
        other: Self,
    ) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn intersects(
        self,
        other: Self,
    ) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool { self.0 == 0 }

    #[inline]
    pub const fn len(self) -> u32 { self.0.count_ones() }

    /// Iterate channels present in the set, in bit order.
    pub fn iter(self) -> impl Iterator<Item = Channel> { Channel::ALL.into_iter().filter(move |c| self.contains(*c)) }
}

impl FromIterator<Channel> for ChannelSet {
    fn from_iter<T: IntoIterator<Item = Channel>>(iter: T) -> Self {
        let mut set = Self::EMPTY;
        for channel in iter {
            set.insert(channel);
        }
        set
    }
}
