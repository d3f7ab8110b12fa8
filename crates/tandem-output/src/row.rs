//! Plain data row types written by output backends.

/// One robot's physical state at a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotSnapshotRow {
    pub tick:     u64,
    pub agent_id: u32,
    /// `"red"` or `"blue"`.
    pub team:     &'static str,
    pub x:        i32,
    pub y:        i32,
    /// `N`, `E`, `S` or `W`.
    pub facing:   char,
    pub carrying: bool,
    /// Partner id; `u32::MAX` when unpaired.
    pub partner:  u32,
}

/// Scores and traffic for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:           u64,
    /// Half-unit deposit credits per team.
    pub red_credits:    u32,
    pub blue_credits:   u32,
    pub gold_remaining: u64,
    pub faults:         usize,
    /// Messages handed to the post office this tick.
    pub messages:       usize,
}
