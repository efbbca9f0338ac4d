//! Player movement state machine
//!
//! All jump, dash and death bookkeeping lives in [`PlayerState`] and changes
//! only through [`PlayerState::transition`]. The variants make the illegal
//! flag combinations unrepresentable: a double jump can only be armed while
//! airborne, and a dead player has no jump or dash state at all.

/// Horizontal facing for dashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    #[inline]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Progress through one airborne cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpPhase {
    /// Jump key still held since takeoff
    Held,
    /// Key seen idle; the double jump is armed
    Released,
    /// Double jump consumed
    Spent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Footing {
    #[default]
    Grounded,
    Airborne(JumpPhase),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dash {
    #[default]
    Ready,
    Active { remaining: f32, direction: Direction },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerState {
    Alive {
        footing: Footing,
        dash: Dash,
        /// Milliseconds until the next dash may start; may run negative
        dash_cooldown: f32,
    },
    Dead {
        respawn_remaining: f32,
    },
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::Alive {
            footing: Footing::Grounded,
            dash: Dash::Ready,
            dash_cooldown: 0.0,
        }
    }
}

/// Something that happened to the player this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    /// Advance timers by `dt` milliseconds
    Tick { dt: f32 },
    /// First jump from the ground
    Launch,
    /// Jump key observed idle
    JumpKeyIdle,
    DoubleJump,
    StartDash {
        direction: Direction,
        duration: f32,
        cooldown: f32,
    },
    /// Touched ground
    Land,
    Die { respawn_delay: f32 },
}

/// What a transition did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not applicable in the current state
    Ignored,
    Applied,
    /// A tick ran the dash timer out
    DashEnded,
    /// A tick ran the respawn timer out; the state is fresh
    Respawned,
}

impl PlayerState {
    pub fn transition(&mut self, trigger: Trigger) -> Outcome {
        match (&mut *self, trigger) {
            (Self::Dead { respawn_remaining }, Trigger::Tick { dt }) => {
                *respawn_remaining -= dt;
                if *respawn_remaining <= 0.0 {
                    *self = Self::default();
                    Outcome::Respawned
                } else {
                    Outcome::Applied
                }
            }
            (Self::Dead { .. }, _) => Outcome::Ignored,

            (Self::Alive { dash, dash_cooldown, .. }, Trigger::Tick { dt }) => {
                if *dash_cooldown > 0.0 {
                    *dash_cooldown -= dt;
                }
                if let Dash::Active { remaining, .. } = dash {
                    *remaining -= dt;
                    if *remaining <= 0.0 {
                        *dash = Dash::Ready;
                        return Outcome::DashEnded;
                    }
                }
                Outcome::Applied
            }

            (Self::Alive { footing, .. }, Trigger::Launch) => match footing {
                Footing::Grounded => {
                    *footing = Footing::Airborne(JumpPhase::Held);
                    Outcome::Applied
                }
                Footing::Airborne(_) => Outcome::Ignored,
            },

            (Self::Alive { footing, .. }, Trigger::JumpKeyIdle) => match footing {
                Footing::Airborne(phase @ JumpPhase::Held) => {
                    *phase = JumpPhase::Released;
                    Outcome::Applied
                }
                _ => Outcome::Ignored,
            },

            (Self::Alive { footing, .. }, Trigger::DoubleJump) => match footing {
                Footing::Airborne(phase @ JumpPhase::Released) => {
                    *phase = JumpPhase::Spent;
                    Outcome::Applied
                }
                _ => Outcome::Ignored,
            },

            (
                Self::Alive { dash, dash_cooldown, .. },
                Trigger::StartDash {
                    direction,
                    duration,
                    cooldown,
                },
            ) => {
                if *dash_cooldown > 0.0 || matches!(dash, Dash::Active { .. }) {
                    return Outcome::Ignored;
                }
                *dash = Dash::Active {
                    remaining: duration,
                    direction,
                };
                *dash_cooldown = cooldown;
                Outcome::Applied
            }

            (Self::Alive { footing, .. }, Trigger::Land) => {
                if *footing == Footing::Grounded {
                    Outcome::Ignored
                } else {
                    *footing = Footing::Grounded;
                    Outcome::Applied
                }
            }

            (state @ Self::Alive { .. }, Trigger::Die { respawn_delay }) => {
                *state = Self::Dead {
                    respawn_remaining: respawn_delay,
                };
                Outcome::Applied
            }
        }
    }

    pub fn footing(&self) -> Option<Footing> {
        match self {
            Self::Alive { footing, .. } => Some(*footing),
            Self::Dead { .. } => None,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.footing() == Some(Footing::Grounded)
    }

    /// In the air after a jump or double jump
    pub fn is_jumping(&self) -> bool {
        matches!(self.footing(), Some(Footing::Airborne(_)))
    }

    /// Double jump armed and unused
    pub fn has_double_jump(&self) -> bool {
        self.footing() == Some(Footing::Airborne(JumpPhase::Released))
    }

    /// The jump key has been seen idle since takeoff
    pub fn space_released_since_jump(&self) -> bool {
        matches!(
            self.footing(),
            Some(Footing::Airborne(JumpPhase::Released | JumpPhase::Spent))
        )
    }

    pub fn is_dashing(&self) -> bool {
        matches!(
            self,
            Self::Alive {
                dash: Dash::Active { .. },
                ..
            }
        )
    }

    /// Milliseconds left in the current dash, zero when not dashing
    pub fn dash_timer(&self) -> f32 {
        match self {
            Self::Alive {
                dash: Dash::Active { remaining, .. },
                ..
            } => *remaining,
            _ => 0.0,
        }
    }

    pub fn dash_cooldown_timer(&self) -> f32 {
        match self {
            Self::Alive { dash_cooldown, .. } => *dash_cooldown,
            Self::Dead { .. } => 0.0,
        }
    }

    pub fn dash_direction(&self) -> Option<Direction> {
        match self {
            Self::Alive {
                dash: Dash::Active { direction, .. },
                ..
            } => Some(*direction),
            _ => None,
        }
    }

    /// A dash may start this frame
    pub fn can_dash(&self) -> bool {
        matches!(self, Self::Alive { dash: Dash::Ready, dash_cooldown, .. } if *dash_cooldown <= 0.0)
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, Self::Dead { .. })
    }

    pub fn respawn_timer(&self) -> f32 {
        match self {
            Self::Dead { respawn_remaining } => *respawn_remaining,
            Self::Alive { .. } => 0.0,
        }
    }
}
