use crate::ParseError;

/// Fuel limits for specimen parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuelLimits {
    /// Maximum total steps: chart items plus reconstruction steps (default: 1,000,000).
    pub(crate) exec_fuel: u32,
    /// Maximum nesting of named nodes while deriving (default: 2,048).
    pub(crate) recursion_limit: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: 1_000_000,
            recursion_limit: 2048,
        }
    }
}

impl FuelLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> u32 {
        self.exec_fuel
    }

    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// Remaining execution fuel for one parse.
#[derive(Debug)]
pub(crate) struct Fuel {
    remaining: u32,
}

impl Fuel {
    pub(crate) fn new(limits: &FuelLimits) -> Self {
        Self {
            remaining: limits.exec_fuel,
        }
    }

    #[inline]
    pub(crate) fn consume(&mut self) -> Result<(), ParseError> {
        if self.remaining == 0 {
            return Err(ParseError::ExecFuelExhausted);
        }
        self.remaining -= 1;
        Ok(())
    }
}
