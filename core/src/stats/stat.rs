/// Running sum of applied deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalStat {
    name: String,
    value: f64,
}

impl TotalStat {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Add `delta`. Not clamped; negative deltas are applied as given.
    pub fn apply(&mut self, delta: f64) -> f64 {
        self.value += delta;
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

/// Rate computed from a [`TotalStat`] each time it is read.
///
/// Holds only the source's name; the value is never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PerSecondAverageStat {
    name: String,
    source: String,
}

impl PerSecondAverageStat {
    pub fn new(name: impl Into<String>, source: &TotalStat) -> Self {
        Self {
            name: name.into(),
            source: source.name().to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the total this rate is derived from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn value(&self, source_value: f64, active_seconds: f64) -> f64 {
        if active_seconds <= 0.0 {
            return 0.0;
        }
        source_value / active_seconds
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stat {
    Total(TotalStat),
    PerSecondAverage(PerSecondAverageStat),
}

impl Stat {
    pub fn total(name: impl Into<String>) -> Self {
        Self::Total(TotalStat::new(name))
    }

    pub fn per_second(name: impl Into<String>, source: &TotalStat) -> Self {
        Self::PerSecondAverage(PerSecondAverageStat::new(name, source))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Total(s) => s.name(),
            Self::PerSecondAverage(s) => s.name(),
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(self, Self::PerSecondAverage(_))
    }

    /// Zero a total; derived stats have nothing to reset.
    pub fn reset(&mut self) {
        if let Self::Total(s) = self {
            s.reset();
        }
    }
}
