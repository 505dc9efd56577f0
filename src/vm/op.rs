//! The eight-symbol instruction alphabet.
//!
//! Programs travel as raw bytes, one ASCII symbol per gene. Decoding is
//! total: a byte outside the alphabet is simply not an instruction.

/// A single tape-machine instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `>`: move the tape cursor one cell right, wrapping at the end.
    Right,
    /// `<`: move the tape cursor one cell left, wrapping at the start.
    Left,
    /// `+`: increment the current cell (signed 8-bit wraparound).
    Inc,
    /// `-`: decrement the current cell (signed 8-bit wraparound).
    Dec,
    /// `.`: emit the current cell to the next output slot.
    Emit,
    /// `,`: input is not supported, clears the current cell.
    Read,
    /// `[`: jump past the matching `]` if the current cell is zero.
    JumpForward,
    /// `]`: jump back past the matching `[` if the current cell is nonzero.
    JumpBackward,
}

impl Op {
    /// Every instruction, in symbol order `<>+-.,[]`.
    pub const ALL: [Op; 8] = [
        Op::Left,
        Op::Right,
        Op::Inc,
        Op::Dec,
        Op::Emit,
        Op::Read,
        Op::JumpForward,
        Op::JumpBackward,
    ];

    /// Decode one gene.
    #[inline]
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'>' => Some(Op::Right),
            b'<' => Some(Op::Left),
            b'+' => Some(Op::Inc),
            b'-' => Some(Op::Dec),
            b'.' => Some(Op::Emit),
            b',' => Some(Op::Read),
            b'[' => Some(Op::JumpForward),
            b']' => Some(Op::JumpBackward),
            _ => None,
        }
    }

    /// The gene byte for this instruction.
    #[inline]
    #[must_use]
    pub fn to_byte(self) -> u8 {
        match self {
            Op::Right => b'>',
            Op::Left => b'<',
            Op::Inc => b'+',
            Op::Dec => b'-',
            Op::Emit => b'.',
            Op::Read => b',',
            Op::JumpForward => b'[',
            Op::JumpBackward => b']',
        }
    }
}

/// Render an instruction sequence for display.
///
/// Genes are ASCII symbols, anything else is shown lossily.
#[must_use]
pub fn decode(genes: &[u8]) -> String {
    String::from_utf8_lossy(genes).into_owned()
}

/// Parse program text, keeping only alphabet symbols.
#[must_use]
pub fn parse_program(source: &str) -> Vec<u8> {
    source
        .bytes()
        .filter(|&b| Op::from_byte(b).is_some())
        .collect()
}
