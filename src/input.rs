//! Controller input decoding and edge-triggered dispatch.
//!
//! # Payload layout (39 bytes)
//!
//! | Bytes  | Field                                                  |
//! |--------|--------------------------------------------------------|
//! | 0      | hand selector (0 = left, anything else = right)        |
//! | 1..=5  | booleans: A, B, Home, JoystickButton, TrackpadTouch    |
//! | 6..=10 | reserved, not decoded                                  |
//! | 11..38 | 7 x f32; slots 0..4 are Trigger, GripValue, GripForce, |
//! |        | JoystickX, JoystickY; slots 5..6 reserved              |
//!
//! Each decode replaces the hand's snapshot atomically and fires the
//! registered listeners for every boolean transition, synchronously and in
//! registration order. A panicking listener is isolated so the remaining
//! listeners still run.

use crate::codec;
use crate::constants::{CONTROLLER_FLOATS_OFFSET, CONTROLLER_INPUT_LEN};
use crate::error::{Error, Result};
use crate::types::HandSide;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Boolean controller inputs, in payload byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolInput {
    A = 0,
    B = 1,
    Home = 2,
    JoystickButton = 3,
    TrackpadTouch = 4,
}

impl BoolInput {
    pub const COUNT: usize = 5;

    pub const ALL: [BoolInput; 5] = [
        BoolInput::A,
        BoolInput::B,
        BoolInput::Home,
        BoolInput::JoystickButton,
        BoolInput::TrackpadTouch,
    ];
}

/// Analog controller inputs, in payload float order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatInput {
    Trigger = 0,
    GripValue = 1,
    GripForce = 2,
    JoystickX = 3,
    JoystickY = 4,
}

/// Immutable controller state for one hand, produced by each decode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSnapshot {
    pub hand: HandSide,
    pub a: bool,
    pub b: bool,
    pub home: bool,
    pub joystick_button: bool,
    pub trackpad_touch: bool,
    pub trigger: f32,
    pub grip_value: f32,
    pub grip_force: f32,
    pub joystick_x: f32,
    pub joystick_y: f32,
}

impl ControllerSnapshot {
    /// All-released snapshot used before the first decode for a hand.
    fn neutral(hand: HandSide) -> Self {
        Self {
            hand,
            a: false,
            b: false,
            home: false,
            joystick_button: false,
            trackpad_touch: false,
            trigger: 0.0,
            grip_value: 0.0,
            grip_force: 0.0,
            joystick_x: 0.0,
            joystick_y: 0.0,
        }
    }

    /// Decode one controller payload.
    ///
    /// Fails with `LengthMismatch` when fewer than 39 bytes arrive; extra
    /// trailing bytes are ignored.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        if payload.len() < CONTROLLER_INPUT_LEN {
            return Err(Error::LengthMismatch(format!(
                "controller payload of {} bytes, need {}",
                payload.len(),
                CONTROLLER_INPUT_LEN
            )));
        }
        let floats = codec::decode_floats(
            &payload[CONTROLLER_FLOATS_OFFSET..CONTROLLER_INPUT_LEN],
        )?;
        Ok(Self {
            hand: HandSide::from_wire(payload[0]),
            a: payload[1 + BoolInput::A as usize] == 1,
            b: payload[1 + BoolInput::B as usize] == 1,
            home: payload[1 + BoolInput::Home as usize] == 1,
            joystick_button: payload[1 + BoolInput::JoystickButton as usize] == 1,
            trackpad_touch: payload[1 + BoolInput::TrackpadTouch as usize] == 1,
            trigger: floats[FloatInput::Trigger as usize],
            grip_value: floats[FloatInput::GripValue as usize],
            grip_force: floats[FloatInput::GripForce as usize],
            joystick_x: floats[FloatInput::JoystickX as usize],
            joystick_y: floats[FloatInput::JoystickY as usize],
        })
    }

    pub fn button(&self, input: BoolInput) -> bool {
        match input {
            BoolInput::A => self.a,
            BoolInput::B => self.b,
            BoolInput::Home => self.home,
            BoolInput::JoystickButton => self.joystick_button,
            BoolInput::TrackpadTouch => self.trackpad_touch,
        }
    }

    pub fn axis(&self, input: FloatInput) -> f32 {
        match input {
            FloatInput::Trigger => self.trigger,
            FloatInput::GripValue => self.grip_value,
            FloatInput::GripForce => self.grip_force,
            FloatInput::JoystickX => self.joystick_x,
            FloatInput::JoystickY => self.joystick_y,
        }
    }
}

/// Edge listener. Invoked synchronously from [`ControllerInputState::feed`].
pub type InputListener = Box<dyn FnMut() + 'static>;

type ListenerGrid = [[Vec<InputListener>; BoolInput::COUNT]; HandSide::COUNT];

/// Polled controller state with per-(hand, input) edge dispatch.
pub struct ControllerInputState {
    snapshots: [ControllerSnapshot; HandSide::COUNT],
    on_listeners: ListenerGrid,
    off_listeners: ListenerGrid,
}

impl ControllerInputState {
    pub fn new() -> Self {
        Self {
            snapshots: [
                ControllerSnapshot::neutral(HandSide::Left),
                ControllerSnapshot::neutral(HandSide::Right),
            ],
            on_listeners: Default::default(),
            off_listeners: Default::default(),
        }
    }

    /// Register a listener for the false -> true edge of one input.
    pub fn add_on_listener(
        &mut self,
        hand: HandSide,
        input: BoolInput,
        listener: impl FnMut() + 'static,
    ) {
        self.on_listeners[hand.index()][input as usize].push(Box::new(listener));
    }

    /// Register a listener for the true -> false edge of one input.
    pub fn add_off_listener(
        &mut self,
        hand: HandSide,
        input: BoolInput,
        listener: impl FnMut() + 'static,
    ) {
        self.off_listeners[hand.index()][input as usize].push(Box::new(listener));
    }

    /// Decode a payload, replace the hand's snapshot, and dispatch edges.
    ///
    /// Returns the hand the payload addressed. On `LengthMismatch` the frame
    /// is dropped and no state changes.
    pub fn feed(&mut self, payload: &[u8]) -> Result<HandSide> {
        let now = ControllerSnapshot::decode(payload)?;
        let hand = now.hand;
        let previous = self.snapshots[hand.index()];
        self.snapshots[hand.index()] = now;

        for input in BoolInput::ALL {
            let was = previous.button(input);
            let is = now.button(input);
            if is && !was {
                dispatch(&mut self.on_listeners[hand.index()][input as usize], hand, input, "on");
            } else if !is && was {
                dispatch(&mut self.off_listeners[hand.index()][input as usize], hand, input, "off");
            }
        }
        Ok(hand)
    }

    /// Current boolean state of one input.
    pub fn button(&self, hand: HandSide, input: BoolInput) -> bool {
        self.snapshots[hand.index()].button(input)
    }

    /// Last decoded value of one analog input.
    pub fn axis(&self, hand: HandSide, input: FloatInput) -> f32 {
        self.snapshots[hand.index()].axis(input)
    }

    /// Last full snapshot for a hand.
    pub fn snapshot(&self, hand: HandSide) -> &ControllerSnapshot {
        &self.snapshots[hand.index()]
    }
}

impl Default for ControllerInputState {
    fn default() -> Self {
        Self::new()
    }
}

fn dispatch(listeners: &mut [InputListener], hand: HandSide, input: BoolInput, edge: &str) {
    for listener in listeners.iter_mut() {
        if catch_unwind(AssertUnwindSafe(|| listener())).is_err() {
            log::warn!(
                "{:?} {:?} {} listener panicked, continuing with the rest",
                hand,
                input,
                edge
            );
        }
    }
}
