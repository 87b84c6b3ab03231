//! A small rotating-device simulation.
//!
//! The chopper powers up through a bearings spin-up delay, ramps its
//! rotation speed toward a commanded target, locks once the target is
//! reached, and spins down when commanded to zero. It exists to give the
//! control server something stateful to expose; the protocol does not
//! depend on it.

use std::fmt;

/// Seconds the bearings take to come up after power-on.
const BEARINGS_SPINUP_SECS: f64 = 3.0;

/// Speed change per second while adjusting or stopping.
const ACCELERATION: f64 = 30.0;

/// Operating states of the simulated chopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChopperState {
    Off,
    Parked,
    Idle,
    AdjustSpeed,
    SpeedLocked,
    Stopping,
}

impl ChopperState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Parked => "parked",
            Self::Idle => "idle",
            Self::AdjustSpeed => "adjust_speed",
            Self::SpeedLocked => "speed_locked",
            Self::Stopping => "stopping",
        }
    }
}

impl fmt::Display for ChopperState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The simulated device. Advance it with [`process`](Self::process) at a
/// fixed cadence; drive it through the exposed properties and commands.
#[derive(Debug)]
pub struct SimpleChopper {
    state: ChopperState,
    power_switch: bool,
    bearings_ready: bool,
    speed: f64,
    target_speed: f64,
    speed_locked: bool,
    command_issued: bool,
    bearings_timer: f64,
}

impl Default for SimpleChopper {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleChopper {
    pub fn new() -> Self {
        Self {
            state: ChopperState::Off,
            power_switch: false,
            bearings_ready: false,
            speed: 0.0,
            target_speed: 0.0,
            speed_locked: false,
            command_issued: false,
            bearings_timer: 0.0,
        }
    }

    pub fn state(&self) -> ChopperState {
        self.state
    }

    pub fn power_switch(&self) -> bool {
        self.power_switch
    }

    pub fn set_power_switch(&mut self, on: bool) {
        self.power_switch = on;
    }

    pub fn bearings_ready(&self) -> bool {
        self.bearings_ready
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn speed_locked(&self) -> bool {
        self.speed_locked
    }

    /// Releases the speed lock; the chopper coasts back to idle.
    pub fn unlock(&mut self) {
        self.speed_locked = false;
    }

    /// Commands a new target speed; takes effect on the next cycle.
    pub fn speed_command(&mut self, target: f64) {
        self.target_speed = target;
        self.command_issued = true;
    }

    /// Advances the simulation by `dt` seconds: at most one state
    /// transition per cycle, otherwise the current state's behavior.
    pub fn process(&mut self, dt: f64) {
        match self.next_state() {
            Some(next) => self.enter(next),
            None => self.tick(dt),
        }
    }

    fn next_state(&self) -> Option<ChopperState> {
        use ChopperState::*;
        match self.state {
            Off if self.power_switch => Some(Parked),
            Parked if !self.power_switch => Some(Off),
            Parked if self.bearings_ready => Some(Idle),
            Idle if !self.power_switch => Some(Off),
            Idle if self.target_changed() => Some(AdjustSpeed),
            Idle if self.target_zeroed() => Some(Stopping),
            AdjustSpeed if self.target_reached() => Some(SpeedLocked),
            AdjustSpeed if self.target_zeroed() => Some(Stopping),
            SpeedLocked if self.target_changed() => Some(AdjustSpeed),
            SpeedLocked if self.target_zeroed() => Some(Stopping),
            SpeedLocked if !self.speed_locked => Some(Idle),
            Stopping if self.speed == 0.0 => Some(Idle),
            _ => None,
        }
    }

    fn enter(&mut self, next: ChopperState) {
        use ChopperState::*;
        if self.state == Off {
            self.bearings_timer = BEARINGS_SPINUP_SECS;
        }
        match next {
            Off => *self = Self::new(),
            AdjustSpeed | Stopping => self.command_issued = false,
            SpeedLocked => self.speed_locked = true,
            Parked | Idle => {}
        }
        if next != Off {
            self.state = next;
        }
    }

    fn tick(&mut self, dt: f64) {
        use ChopperState::*;
        match self.state {
            Off => {}
            Parked => {
                if self.bearings_timer > 0.0 {
                    self.bearings_timer -= dt;
                }
                if self.bearings_timer <= 0.0 {
                    self.bearings_ready = true;
                }
            }
            Idle => {
                // Coast down gradually while unpowered by a command.
                if self.speed < 0.1 {
                    self.speed = 0.0;
                } else {
                    self.speed -= (self.speed / 8.0) * dt;
                }
            }
            AdjustSpeed => {
                let step = ACCELERATION * dt;
                if (self.target_speed - self.speed).abs() <= step {
                    self.speed = self.target_speed;
                } else if self.speed < self.target_speed {
                    self.speed += step;
                } else {
                    self.speed -= step;
                }
            }
            SpeedLocked => {
                self.speed = self.target_speed;
            }
            Stopping => {
                self.speed = (self.speed - ACCELERATION * dt).max(0.0);
            }
        }
    }

    fn target_changed(&self) -> bool {
        self.command_issued && self.target_speed != 0.0 && self.target_speed != self.speed
    }

    fn target_reached(&self) -> bool {
        self.target_speed != 0.0 && self.speed == self.target_speed
    }

    fn target_zeroed(&self) -> bool {
        self.command_issued && self.target_speed == 0.0 && self.speed != 0.0
    }
}
