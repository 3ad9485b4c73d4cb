use std::fmt;

use crate::opcode::Opcode;

/// # Instructions
/// Every operation of the Chip-8 instruction set, decoded from an `Opcode`.
///
/// `x` and `y` name the registers Vx and Vy, `kk` is an immediate byte, `addr` a 12-bit
/// address and `n` a 4-bit immediate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// 0nnn; jump to a machine code routine; ignored
    Sys { addr: u16 },
    /// 00E0; clear the display
    Cls,
    /// 00EE; return from a subroutine
    Ret,
    /// 1nnn; PC = addr
    Jp { addr: u16 },
    /// 2nnn; STACK.push(PC + 2); PC = addr
    Call { addr: u16 },
    /// 3xkk; skip if Vx == kk
    SeByte { x: u8, kk: u8 },
    /// 4xkk; skip if Vx != kk
    SneByte { x: u8, kk: u8 },
    /// 5xy0; skip if Vx == Vy
    SeReg { x: u8, y: u8 },
    /// 6xkk; Vx = kk
    LdByte { x: u8, kk: u8 },
    /// 7xkk; Vx += kk without touching VF
    AddByte { x: u8, kk: u8 },
    /// 8xy0; Vx = Vy
    LdReg { x: u8, y: u8 },
    /// 8xy1; Vx |= Vy
    Or { x: u8, y: u8 },
    /// 8xy2; Vx &= Vy
    And { x: u8, y: u8 },
    /// 8xy3; Vx ^= Vy
    Xor { x: u8, y: u8 },
    /// 8xy4; Vx += Vy; VF = carry
    AddReg { x: u8, y: u8 },
    /// 8xy5; Vx -= Vy; VF = !borrow
    Sub { x: u8, y: u8 },
    /// 8xy6; Vx >>= 1; VF = shifted out bit
    Shr { x: u8, y: u8 },
    /// 8xy7; Vx = Vy - Vx; VF = !borrow
    Subn { x: u8, y: u8 },
    /// 8xyE; Vx <<= 1; VF = shifted out bit
    Shl { x: u8, y: u8 },
    /// 9xy0; skip if Vx != Vy
    SneReg { x: u8, y: u8 },
    /// Annn; I = addr
    LdI { addr: u16 },
    /// Bnnn; PC = V0 + addr
    JpV0 { addr: u16 },
    /// Cxkk; Vx = random & kk
    Rnd { x: u8, kk: u8 },
    /// Dxyn; draw n bytes of sprite from I at (Vx, Vy); VF = collision
    Drw { x: u8, y: u8, n: u8 },
    /// Ex9E; skip if key Vx is pressed
    Skp { x: u8 },
    /// ExA1; skip if key Vx is not pressed
    Sknp { x: u8 },
    /// Fx07; Vx = DT
    LdVxDt { x: u8 },
    /// Fx0A; wait for a key and store it in Vx
    LdVxK { x: u8 },
    /// Fx15; DT = Vx
    LdDtVx { x: u8 },
    /// Fx18; ST = Vx
    LdStVx { x: u8 },
    /// Fx1E; I += Vx
    AddI { x: u8 },
    /// Fx29; I = address of the font glyph for Vx
    LdF { x: u8 },
    /// Fx33; mem[I..I+3] = bcd(Vx)
    LdB { x: u8 },
    /// Fx55; mem[I..=I+x] = V0..=Vx
    LdIVx { x: u8 },
    /// Fx65; V0..=Vx = mem[I..=I+x]
    LdVxI { x: u8 },
    /// Anything not covered above
    Unknown(Opcode),
}

impl Instruction {
    /// Selects the Instruction encoded by an Opcode.
    ///
    /// Total: opcodes that aren't part of the instruction set decode to `Unknown`.
    pub fn decode(op: Opcode) -> Instruction {
        use Instruction::*;

        let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.addr());
        match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Cls,
            (0x0, 0x0, 0xE, 0xE) => Ret,
            (0x0, ..) => Sys { addr },
            (0x1, ..) => Jp { addr },
            (0x2, ..) => Call { addr },
            (0x3, ..) => SeByte { x, kk },
            (0x4, ..) => SneByte { x, kk },
            (0x5, .., 0x0) => SeReg { x, y },
            (0x6, ..) => LdByte { x, kk },
            (0x7, ..) => AddByte { x, kk },
            (0x8, .., 0x0) => LdReg { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => AddReg { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => Shr { x, y },
            (0x8, .., 0x7) => Subn { x, y },
            (0x8, .., 0xE) => Shl { x, y },
            (0x9, .., 0x0) => SneReg { x, y },
            (0xA, ..) => LdI { addr },
            (0xB, ..) => JpV0 { addr },
            (0xC, ..) => Rnd { x, kk },
            (0xD, ..) => Drw { x, y, n },
            (0xE, _, 0x9, 0xE) => Skp { x },
            (0xE, _, 0xA, 0x1) => Sknp { x },
            (0xF, _, 0x0, 0x7) => LdVxDt { x },
            (0xF, _, 0x0, 0xA) => LdVxK { x },
            (0xF, _, 0x1, 0x5) => LdDtVx { x },
            (0xF, _, 0x1, 0x8) => LdStVx { x },
            (0xF, _, 0x1, 0xE) => AddI { x },
            (0xF, _, 0x2, 0x9) => LdF { x },
            (0xF, _, 0x3, 0x3) => LdB { x },
            (0xF, _, 0x5, 0x5) => LdIVx { x },
            (0xF, _, 0x6, 0x5) => LdVxI { x },
            _ => Unknown(op),
        }
    }
}

impl From<Opcode> for Instruction {
    fn from(op: Opcode) -> Self {
        Instruction::decode(op)
    }
}

/// Assembler mnemonics, as printed in the execution trace
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Sys { addr } => write!(f, "SYS {:#05X}", addr),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp { addr } => write!(f, "JP {:#05X}", addr),
            Call { addr } => write!(f, "CALL {:#05X}", addr),
            SeByte { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            SneByte { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            SeReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LdByte { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            AddByte { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            LdReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            Subn { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SneReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI { addr } => write!(f, "LD I, {:#05X}", addr),
            JpV0 { addr } => write!(f, "JP V0, {:#05X}", addr),
            Rnd { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Drw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Skp { x } => write!(f, "SKP V{:X}", x),
            Sknp { x } => write!(f, "SKNP V{:X}", x),
            LdVxDt { x } => write!(f, "LD V{:X}, DT", x),
            LdVxK { x } => write!(f, "LD V{:X}, K", x),
            LdDtVx { x } => write!(f, "LD DT, V{:X}", x),
            LdStVx { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LdF { x } => write!(f, "LD F, V{:X}", x),
            LdB { x } => write!(f, "LD B, V{:X}", x),
            LdIVx { x } => write!(f, "LD [I], V{:X}", x),
            LdVxI { x } => write!(f, "LD V{:X}, [I]", x),
            Unknown(op) => write!(f, "??? {}", op),
        }
    }
}
