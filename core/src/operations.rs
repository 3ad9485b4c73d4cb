use log::debug;
use rand::{Rng, RngCore};

use crate::config::Quirks;
use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_ADDR, FONT_GLYPH_SIZE, OPCODE_SIZE};
use crate::error::{Chip8Error, Result, StackFault};
use crate::frontend::Keypad;
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::state::{KeyWait, State};
use crate::timer::Timers;

/// Everything an instruction can touch besides the `State` snapshot itself
pub struct Peripherals<'a> {
    pub keypad: &'a Keypad,
    pub timers: &'a Timers,
    pub rng: &'a mut dyn RngCore,
    pub quirks: Quirks,
    /// Unknown opcodes are fatal rather than skipped
    pub strict: bool,
}

/// Applies an instruction to `state`, returning the state that follows it.
///
/// `state` itself is never modified, so an instruction that fails leaves no trace of
/// partial execution. The only effects outside the returned state are timer loads,
/// which can't fail.
pub fn execute(instruction: Instruction, state: &State, io: &mut Peripherals) -> Result<State> {
    use Instruction::*;

    match instruction {
        Sys { addr } => sys(addr, state),
        Cls => clr(state),
        Ret => rts(state),
        Jp { addr } => jump(addr, state),
        Call { addr } => call(addr, state),
        SeByte { x, kk } => Ok(skip_if(state.v[x as usize] == kk, state)),
        SneByte { x, kk } => Ok(skip_if(state.v[x as usize] != kk, state)),
        SeReg { x, y } => Ok(skip_if(state.v[x as usize] == state.v[y as usize], state)),
        SneReg { x, y } => Ok(skip_if(state.v[x as usize] != state.v[y as usize], state)),
        LdByte { x, kk } => load(x, kk, state),
        AddByte { x, kk } => add(x, kk, state),
        LdReg { x, y } => mv(x, y, state),
        Or { x, y } => logic(x, y, state, io.quirks, |a, b| a | b),
        And { x, y } => logic(x, y, state, io.quirks, |a, b| a & b),
        Xor { x, y } => logic(x, y, state, io.quirks, |a, b| a ^ b),
        AddReg { x, y } => addr(x, y, state),
        Sub { x, y } => sub(x, y, state),
        Shr { x, y } => shr(x, y, state, io.quirks),
        Subn { x, y } => subn(x, y, state),
        Shl { x, y } => shl(x, y, state, io.quirks),
        LdI { addr } => loadi(addr, state),
        JpV0 { addr } => jumpi(addr, state, io.quirks),
        Rnd { x, kk } => rnd(x, kk, state, io.rng),
        Drw { x, y, n } => draw(x, y, n, state),
        Skp { x } => Ok(skip_if(pressed(io.keypad, state.v[x as usize]), state)),
        Sknp { x } => Ok(skip_if(!pressed(io.keypad, state.v[x as usize]), state)),
        LdVxDt { x } => moved(x, state, io.timers),
        LdVxK { x } => keyd(x, state),
        LdDtVx { x } => {
            io.timers.set_delay(state.v[x as usize]);
            Ok(advance(state))
        }
        LdStVx { x } => {
            io.timers.set_sound(state.v[x as usize]);
            Ok(advance(state))
        }
        AddI { x } => addi(x, state),
        LdF { x } => ldspr(x, state),
        LdB { x } => bcd(x, state),
        LdIVx { x } => stor(x, state, io.quirks),
        LdVxI { x } => read(x, state, io.quirks),
        Unknown(opcode) => unknown(opcode, state, io.strict),
    }
}

/// PC += 2
fn advance(state: &State) -> State {
    State {
        pc: state.pc + OPCODE_SIZE,
        ..*state
    }
}

/// if condition then pc += 4 else pc += 2
fn skip_if(condition: bool, state: &State) -> State {
    let step = if condition { 2 * OPCODE_SIZE } else { OPCODE_SIZE };
    State {
        pc: state.pc + step,
        ..*state
    }
}

fn pressed(keypad: &Keypad, key: u8) -> bool {
    keypad[(key & 0xF) as usize]
}

fn stack_fault(fault: StackFault, state: &State) -> Chip8Error {
    Chip8Error::StackFault {
        fault,
        address: state.pc,
    }
}

/// machine code routine; modern interpreters ignore these
fn sys(addr: u16, state: &State) -> Result<State> {
    debug!("ignoring SYS {:#05X} at {:#05X}", addr, state.pc);
    Ok(advance(state))
}

/// clear
fn clr(state: &State) -> Result<State> {
    let mut frame_buffer = state.frame_buffer;
    frame_buffer.clear();
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        frame_buffer,
        draw_flag: true,
        ..*state
    })
}

/// PC = STACK.pop()
fn rts(state: &State) -> Result<State> {
    let mut stack = state.stack;
    let pc = stack.pop().map_err(|fault| stack_fault(fault, state))?;
    Ok(State { pc, stack, ..*state })
}

/// PC = addr
fn jump(addr: u16, state: &State) -> Result<State> {
    Ok(State { pc: addr, ..*state })
}

/// STACK.push(PC + 2); PC = addr
fn call(addr: u16, state: &State) -> Result<State> {
    let mut stack = state.stack;
    stack
        .push(state.pc + OPCODE_SIZE)
        .map_err(|fault| stack_fault(fault, state))?;
    Ok(State {
        pc: addr,
        stack,
        ..*state
    })
}

/// Vx = kk
fn load(x: u8, kk: u8, state: &State) -> Result<State> {
    let mut v = state.v;
    v[x as usize] = kk;
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        v,
        ..*state
    })
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
fn add(x: u8, kk: u8, state: &State) -> Result<State> {
    let mut v = state.v;
    v[x as usize] = v[x as usize].wrapping_add(kk);
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        v,
        ..*state
    })
}

/// Vx = Vy
fn mv(x: u8, y: u8, state: &State) -> Result<State> {
    let mut v = state.v;
    v[x as usize] = v[y as usize];
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        v,
        ..*state
    })
}

/// Vx = Vx op Vy, for OR, AND and XOR
fn logic(x: u8, y: u8, state: &State, quirks: Quirks, op: fn(u8, u8) -> u8) -> Result<State> {
    let mut v = state.v;
    v[x as usize] = op(v[x as usize], v[y as usize]);
    if quirks.logic_resets_vf {
        v[0xF] = 0x0;
    }
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        v,
        ..*state
    })
}

/// Vx += Vy; VF = overflow
fn addr(x: u8, y: u8, state: &State) -> Result<State> {
    let mut v = state.v;
    let (res, over) = v[x as usize].overflowing_add(v[y as usize]);
    v[x as usize] = res;
    v[0xF] = over as u8;
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        v,
        ..*state
    })
}

/// Vx -= Vy; VF = !underflow
fn sub(x: u8, y: u8, state: &State) -> Result<State> {
    let mut v = state.v;
    let (res, under) = v[x as usize].overflowing_sub(v[y as usize]);
    v[x as usize] = res;
    v[0xF] = !under as u8;
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        v,
        ..*state
    })
}

/// Vx = Vy - Vx; VF = !underflow
fn subn(x: u8, y: u8, state: &State) -> Result<State> {
    let mut v = state.v;
    let (res, under) = v[y as usize].overflowing_sub(v[x as usize]);
    v[x as usize] = res;
    v[0xF] = !under as u8;
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        v,
        ..*state
    })
}

/// Vx = Vx >> 1; VF = shifted out bit
fn shr(x: u8, y: u8, state: &State, quirks: Quirks) -> Result<State> {
    let mut v = state.v;
    let source = if quirks.shift_reads_vy { v[y as usize] } else { v[x as usize] };
    v[x as usize] = source >> 1;
    v[0xF] = source & 0x1;
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        v,
        ..*state
    })
}

/// Vx = Vx << 1; VF = shifted out bit
fn shl(x: u8, y: u8, state: &State, quirks: Quirks) -> Result<State> {
    let mut v = state.v;
    let source = if quirks.shift_reads_vy { v[y as usize] } else { v[x as usize] };
    v[x as usize] = source << 1;
    v[0xF] = source >> 7;
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        v,
        ..*state
    })
}

/// I = addr
fn loadi(addr: u16, state: &State) -> Result<State> {
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        i: addr,
        ..*state
    })
}

/// PC = V0 + addr
fn jumpi(addr: u16, state: &State, quirks: Quirks) -> Result<State> {
    let register = if quirks.jump_reads_vx { (addr >> 8) as usize } else { 0x0 };
    Ok(State {
        pc: addr + u16::from(state.v[register]),
        ..*state
    })
}

/// Vx = rand_byte & kk
fn rnd(x: u8, kk: u8, state: &State, rng: &mut dyn RngCore) -> Result<State> {
    let rand_byte: u8 = rng.gen();
    let mut v = state.v;
    v[x as usize] = rand_byte & kk;
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        v,
        ..*state
    })
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels were erased.
fn draw(x: u8, y: u8, n: u8, state: &State) -> Result<State> {
    // every sprite byte is read before the first pixel changes
    let sprite = state.memory.slice(state.i, n as usize)?;
    let left = state.v[x as usize] as usize % DISPLAY_WIDTH;
    let top = state.v[y as usize] as usize % DISPLAY_HEIGHT;

    let mut frame_buffer = state.frame_buffer;
    let mut collision = false;
    for (row, byte) in sprite.iter().enumerate() {
        collision |= frame_buffer.xor_sprite_row(left, top + row, *byte);
    }

    let mut v = state.v;
    v[0xF] = collision as u8;
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    })
}

/// Vx = DT
fn moved(x: u8, state: &State, timers: &Timers) -> Result<State> {
    let mut v = state.v;
    v[x as usize] = timers.delay();
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        v,
        ..*state
    })
}

/// await keypress for Vx
fn keyd(x: u8, state: &State) -> Result<State> {
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        awaiting_key: Some(KeyWait {
            register: x,
            pressed: None,
        }),
        ..*state
    })
}

/// I += Vx
fn addi(x: u8, state: &State) -> Result<State> {
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        i: state.i.wrapping_add(u16::from(state.v[x as usize])),
        ..*state
    })
}

/// I = FONT_ADDR + Vx * 5
/// Set I to the memory address of the font glyph for the low nibble of Vx
fn ldspr(x: u8, state: &State) -> Result<State> {
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        i: FONT_ADDR + u16::from(state.v[x as usize] & 0xF) * FONT_GLYPH_SIZE,
        ..*state
    })
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
fn bcd(x: u8, state: &State) -> Result<State> {
    let vx = state.v[x as usize];
    let mut memory = state.memory;
    memory.write_slice(state.i, &[vx / 100, vx / 10 % 10, vx % 10])?;
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        memory,
        ..*state
    })
}

/// mem[I..=I+x] = V0..=Vx
fn stor(x: u8, state: &State, quirks: Quirks) -> Result<State> {
    let mut memory = state.memory;
    memory.write_slice(state.i, &state.v[..=x as usize])?;
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        i: block_end(x, state, quirks),
        memory,
        ..*state
    })
}

/// V0..=Vx = mem[I..=I+x]
fn read(x: u8, state: &State, quirks: Quirks) -> Result<State> {
    let mut v = state.v;
    v[..=x as usize].copy_from_slice(state.memory.slice(state.i, x as usize + 1)?);
    Ok(State {
        pc: state.pc + OPCODE_SIZE,
        i: block_end(x, state, quirks),
        v,
        ..*state
    })
}

/// Where I points after a register block load/store
fn block_end(x: u8, state: &State, quirks: Quirks) -> u16 {
    if quirks.load_store_increments_i {
        state.i.wrapping_add(u16::from(x) + 1)
    } else {
        state.i
    }
}

fn unknown(opcode: Opcode, state: &State, strict: bool) -> Result<State> {
    if strict {
        return Err(Chip8Error::UnknownOpcode {
            opcode,
            address: state.pc,
        });
    }
    debug!("skipping unknown opcode {} at {:#05X}", opcode, state.pc);
    Ok(advance(state))
}

#[cfg(test)]
mod test_operations {
    use super::*;
    use crate::constants::STACK_DEPTH;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn exec_with(op: u16, state: &State, keypad: Keypad, quirks: Quirks) -> Result<State> {
        let timers = Timers::new();
        let mut rng = SmallRng::seed_from_u64(8);
        let mut io = Peripherals {
            keypad: &keypad,
            timers: &timers,
            rng: &mut rng,
            quirks,
            strict: false,
        };
        execute(Instruction::decode(Opcode::new(op)), state, &mut io)
    }

    fn exec(op: u16, state: &State) -> State {
        exec_with(op, state, [false; 16], Quirks::default()).unwrap()
    }

    #[test]
    fn test_00e0_cls() {
        let mut state = State::new();
        state.frame_buffer.set_pixel(0, 0, true);
        let state = exec(0x00E0, &state);
        assert!(!state.frame_buffer.pixel(0, 0));
        assert!(state.draw_flag);
        assert_eq!(state.pc, 0x202);
    }

    #[test]
    fn test_00ee_ret() {
        let mut state = State::new();
        state.stack.push(0xABC).unwrap();
        let state = exec(0x00EE, &state);
        assert!(state.stack.is_empty());
        assert_eq!(state.pc, 0xABC);
    }

    #[test]
    fn test_00ee_ret_underflows() {
        let state = State::new();
        let err = exec_with(0x00EE, &state, [false; 16], Quirks::default()).unwrap_err();
        assert!(matches!(
            err,
            Chip8Error::StackFault {
                fault: StackFault::Underflow,
                address: 0x200
            }
        ));
    }

    #[test]
    fn test_0nnn_sys_is_ignored() {
        let state = State::new();
        let after = exec(0x0123, &state);
        assert_eq!(after, State { pc: 0x202, ..state });
    }

    #[test]
    fn test_1nnn_jp() {
        let state = exec(0x1ABC, &State::new());
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_2nnn_call() {
        let mut state = State::new();
        state.pc = 0x0ABC;
        let state = exec(0x2123, &state);
        assert_eq!(state.stack.depth(), 1);
        assert_eq!(state.stack.peek(), Some(0x0ABE));
        assert_eq!(state.pc, 0x0123);
    }

    #[test]
    fn test_2nnn_call_then_ret_returns_past_call() {
        let state = State::new();
        let state = exec(0x2400, &state);
        let state = exec(0x00EE, &state);
        assert_eq!(state.pc, 0x202);
    }

    #[test]
    fn test_2nnn_call_overflows() {
        let mut state = State::new();
        for _ in 0..STACK_DEPTH {
            state = exec(0x2200, &state);
        }
        let err = exec_with(0x2200, &state, [false; 16], Quirks::default()).unwrap_err();
        assert!(matches!(
            err,
            Chip8Error::StackFault {
                fault: StackFault::Overflow,
                ..
            }
        ));
    }

    #[test]
    fn test_3xkk_se_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        assert_eq!(exec(0x3111, &state).pc, 0x0204);
    }

    #[test]
    fn test_3xkk_se_doesntskip() {
        assert_eq!(exec(0x3111, &State::new()).pc, 0x0202);
    }

    #[test]
    fn test_4xkk_sne_skips() {
        assert_eq!(exec(0x4111, &State::new()).pc, 0x0204);
    }

    #[test]
    fn test_4xkk_sne_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        assert_eq!(exec(0x4111, &state).pc, 0x0202);
    }

    #[test]
    fn test_5xy0_se_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        assert_eq!(exec(0x5120, &state).pc, 0x0204);
    }

    #[test]
    fn test_5xy0_se_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        assert_eq!(exec(0x5120, &state).pc, 0x0202);
    }

    #[test]
    fn test_6xkk_ld() {
        let state = exec(0x6122, &State::new());
        assert_eq!(state.v[0x1], 0x22);
    }

    #[test]
    fn test_7xkk_add_wraps_without_flag() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        let state = exec(0x7102, &state);
        assert_eq!(state.v[0x1], 0x01);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy0_ld() {
        let mut state = State::new();
        state.v[0x2] = 0x1;
        let state = exec(0x8120, &state);
        assert_eq!(state.v[0x1], 0x1);
    }

    #[test]
    fn test_8xy1_or() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        state.v[0xF] = 0x1;
        let state = exec(0x8121, &state);
        assert_eq!(state.v[0x1], 0x7);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy2_and() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = exec(0x8122, &state);
        assert_eq!(state.v[0x1], 0x2);
    }

    #[test]
    fn test_8xy3_xor() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = exec(0x8123, &state);
        assert_eq!(state.v[0x1], 0x5);
    }

    #[test]
    fn test_8xy3_xor_resets_vf_on_cosmac() {
        let mut state = State::new();
        state.v[0xF] = 0x1;
        let state = exec_with(0x8123, &state, [false; 16], Quirks::cosmac_vip()).unwrap();
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy4_add_nocarry() {
        let mut state = State::new();
        state.v[0x1] = 0xEE;
        state.v[0x2] = 0x11;
        let state = exec(0x8124, &state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy4_add_carry() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        state.v[0x2] = 0x01;
        let state = exec(0x8124, &state);
        assert_eq!(state.v[0x1], 0x00);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy4_flag_wins_over_vf_result() {
        let mut state = State::new();
        state.v[0xF] = 0xFF;
        state.v[0x1] = 0x02;
        let state = exec(0x8F14, &state);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 0x33;
        state.v[0x2] = 0x11;
        let state = exec(0x8125, &state);
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x05;
        state.v[0x2] = 0x0A;
        let state = exec(0x8125, &state);
        assert_eq!(state.v[0x1], 0xFB);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy5_sub_equal_is_no_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x42;
        state.v[0x2] = 0x42;
        let state = exec(0x8125, &state);
        assert_eq!(state.v[0x1], 0x00);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_lsb() {
        let mut state = State::new();
        state.v[0x1] = 0x5;
        let state = exec(0x8106, &state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_nolsb() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        let state = exec(0x8106, &state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy6_shr_reads_vy_on_cosmac() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        state.v[0x2] = 0x7;
        let state = exec_with(0x8126, &state, [false; 16], Quirks::cosmac_vip()).unwrap();
        assert_eq!(state.v[0x1], 0x3);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy7_subn_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x33;
        let state = exec(0x8127, &state);
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy7_subn_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x12;
        state.v[0x2] = 0x11;
        let state = exec(0x8127, &state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xye_shl_msb() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        let state = exec(0x810E, &state);
        // 0xFF * 2 = 0x01FE
        assert_eq!(state.v[0x1], 0xFE);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xye_shl_nomsb() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        let state = exec(0x810E, &state);
        assert_eq!(state.v[0x1], 0x8);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_9xy0_sne_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        assert_eq!(exec(0x9120, &state).pc, 0x0204);
    }

    #[test]
    fn test_9xy0_sne_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        assert_eq!(exec(0x9120, &state).pc, 0x0202);
    }

    #[test]
    fn test_annn_ld() {
        let state = exec(0xAABC, &State::new());
        assert_eq!(state.i, 0xABC);
    }

    #[test]
    fn test_bnnn_jp() {
        let mut state = State::new();
        state.v[0x0] = 0x2;
        let state = exec(0xBABC, &state);
        assert_eq!(state.pc, 0xABE);
    }

    #[test]
    fn test_bxnn_jp_reads_vx_when_configured() {
        let mut state = State::new();
        state.v[0xA] = 0x4;
        let quirks = Quirks {
            jump_reads_vx: true,
            ..Quirks::default()
        };
        let state = exec_with(0xBABC, &state, [false; 16], quirks).unwrap();
        assert_eq!(state.pc, 0xAC0);
    }

    #[test]
    fn test_cxkk_rnd_is_masked() {
        let state = exec(0xC10F, &State::new());
        assert_eq!(state.v[0x1] & 0xF0, 0x0);
        let state = exec(0xC100, &state);
        assert_eq!(state.v[0x1], 0x0);
    }

    #[test]
    fn test_dxyn_drw_draws() {
        let mut state = State::new();
        state.v[0x0] = 0x1;
        state.i = FONT_ADDR;
        // Draw the 0x0 glyph with a 1x 1y offset
        let state = exec(0xD005, &state);
        let expected = [
            [true, true, true, true],
            [true, false, false, true],
            [true, false, false, true],
            [true, false, false, true],
            [true, true, true, true],
        ];
        for (row, pixels) in expected.iter().enumerate() {
            for (col, lit) in pixels.iter().enumerate() {
                assert_eq!(state.frame_buffer.pixel(1 + col, 1 + row), *lit);
            }
        }
        assert_eq!(state.frame_buffer.lit_pixels(), 14);
        assert_eq!(state.v[0xF], 0x0);
        assert!(state.draw_flag);
    }

    #[test]
    fn test_dxyn_drw_collides() {
        let mut state = State::new();
        state.i = FONT_ADDR;
        state.frame_buffer.set_pixel(0, 0, true);
        let state = exec(0xD001, &state);
        assert_eq!(state.v[0xF], 0x1)
    }

    #[test]
    fn test_dxyn_drw_twice_erases() {
        let mut state = State::new();
        state.i = FONT_ADDR;
        let state = exec(0xD005, &state);
        assert_eq!(state.v[0xF], 0x0);
        let state = exec(0xD005, &state);
        assert_eq!(state.v[0xF], 0x1);
        assert_eq!(state.frame_buffer.lit_pixels(), 0);
    }

    #[test]
    fn test_dxyn_drw_xors() {
        let mut state = State::new();
        state.i = FONT_ADDR;
        // 0 1 0 1 -> Set
        state.frame_buffer.set_pixel(1, 0, true);
        state.frame_buffer.set_pixel(3, 0, true);
        // 1 1 1 1 -> Draw xor
        let state = exec(0xD001, &state);
        let row: Vec<bool> = (0..4).map(|x| state.frame_buffer.pixel(x, 0)).collect();
        assert_eq!(row, [true, false, true, false]);
    }

    #[test]
    fn test_dxyn_drw_wraps_start_coordinates() {
        let mut state = State::new();
        state.i = FONT_ADDR;
        state.v[0x0] = 64 + 2;
        state.v[0x1] = 32 + 3;
        let state = exec(0xD011, &state);
        assert!(state.frame_buffer.pixel(2, 3));
    }

    #[test]
    fn test_dxyn_drw_wraps_sprite_bottom() {
        let mut state = State::new();
        state.i = FONT_ADDR;
        state.v[0x1] = 30;
        let state = exec(0xD015, &state);
        // the glyph's third and fourth rows wrap onto screen rows 0 and 1
        assert!(state.frame_buffer.pixel(0, 0));
        assert!(state.frame_buffer.pixel(0, 1));
        assert!(!state.frame_buffer.pixel(1, 0));
    }

    #[test]
    fn test_dxyn_drw_fault_leaves_screen_untouched() {
        let mut state = State::new();
        state.i = 0xFFE;
        let err = exec_with(0xD005, &state, [false; 16], Quirks::default()).unwrap_err();
        assert!(matches!(err, Chip8Error::OutOfBounds { .. }));
    }

    #[test]
    fn test_ex9e_skp_skips() {
        let mut state = State::new();
        let mut keypad = [false; 16];
        keypad[0xE] = true;
        state.v[0x1] = 0xE;
        let state = exec_with(0xE19E, &state, keypad, Quirks::default()).unwrap();
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_ex9e_skp_doesntskip() {
        assert_eq!(exec(0xE19E, &State::new()).pc, 0x0202);
    }

    #[test]
    fn test_exa1_sknp_skips() {
        assert_eq!(exec(0xE1A1, &State::new()).pc, 0x0204);
    }

    #[test]
    fn test_exa1_sknp_doesntskip() {
        let mut state = State::new();
        let mut keypad = [false; 16];
        keypad[0xE] = true;
        state.v[0x1] = 0xE;
        let state = exec_with(0xE1A1, &state, keypad, Quirks::default()).unwrap();
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx07_ld_reads_delay_timer() {
        let timers = Timers::new();
        timers.set_delay(0xF);
        let mut rng = SmallRng::seed_from_u64(0);
        let mut io = Peripherals {
            keypad: &[false; 16],
            timers: &timers,
            rng: &mut rng,
            quirks: Quirks::default(),
            strict: false,
        };
        let state = execute(Instruction::LdVxDt { x: 1 }, &State::new(), &mut io).unwrap();
        assert_eq!(state.v[0x1], 0xF);
    }

    #[test]
    fn test_fx0a_ld_sets_key_wait() {
        let state = exec(0xF10A, &State::new());
        assert_eq!(
            state.awaiting_key,
            Some(KeyWait {
                register: 0x1,
                pressed: None
            })
        );
        assert_eq!(state.pc, 0x202);
    }

    #[test]
    fn test_fx15_fx18_load_timers() {
        let timers = Timers::new();
        let mut rng = SmallRng::seed_from_u64(0);
        let mut io = Peripherals {
            keypad: &[false; 16],
            timers: &timers,
            rng: &mut rng,
            quirks: Quirks::default(),
            strict: false,
        };
        let mut state = State::new();
        state.v[0x1] = 0xF;
        state.v[0x2] = 0x3;
        let state = execute(Instruction::LdDtVx { x: 1 }, &state, &mut io).unwrap();
        let state = execute(Instruction::LdStVx { x: 2 }, &state, &mut io).unwrap();
        assert_eq!(timers.delay(), 0xF);
        assert_eq!(timers.sound(), 0x3);
        assert_eq!(state.pc, 0x204);
    }

    #[test]
    fn test_fx1e_add() {
        let mut state = State::new();
        state.i = 0x1;
        state.v[0x1] = 0x1;
        let state = exec(0xF11E, &state);
        assert_eq!(state.i, 0x2);
    }

    #[test]
    fn test_fx29_ld() {
        let mut state = State::new();
        state.v[0x1] = 0x2;
        let state = exec(0xF129, &state);
        assert_eq!(state.i, FONT_ADDR + 0xA);
    }

    #[test]
    fn test_fx33_ld() {
        let mut state = State::new();
        // 0x7B -> 123
        state.v[0x1] = 0x7B;
        state.i = 0x300;
        let state = exec(0xF133, &state);
        assert_eq!(state.memory.slice(0x300, 3).unwrap(), &[0x1, 0x2, 0x3]);
    }

    #[test]
    fn test_fx33_ld_out_of_bounds() {
        let mut state = State::new();
        state.i = 0xFFE;
        let err = exec_with(0xF133, &state, [false; 16], Quirks::default()).unwrap_err();
        assert!(matches!(err, Chip8Error::OutOfBounds { .. }));
    }

    #[test]
    fn test_fx55_ld() {
        let mut state = State::new();
        state.i = 0x300;
        state.v[0x0..0x5].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5]);
        let state = exec(0xF455, &state);
        assert_eq!(state.memory.slice(0x300, 6).unwrap(), &[0x1, 0x2, 0x3, 0x4, 0x5, 0x0]);
        assert_eq!(state.i, 0x300);
    }

    #[test]
    fn test_fx55_ld_increments_i_on_cosmac() {
        let mut state = State::new();
        state.i = 0x300;
        let state = exec_with(0xF455, &state, [false; 16], Quirks::cosmac_vip()).unwrap();
        assert_eq!(state.i, 0x305);
    }

    #[test]
    fn test_fx65_ld() {
        let mut state = State::new();
        state.i = 0x300;
        state
            .memory
            .write_slice(0x300, &[0x1, 0x2, 0x3, 0x4, 0x5, 0x6])
            .unwrap();
        let state = exec(0xF465, &state);
        assert_eq!(state.v[0x0..0x6], [0x1, 0x2, 0x3, 0x4, 0x5, 0x0]);
    }

    #[test]
    fn test_unknown_is_skipped_when_permissive() {
        let state = exec(0x5121, &State::new());
        assert_eq!(state.pc, 0x202);
    }

    #[test]
    fn test_unknown_is_fatal_when_strict() {
        let timers = Timers::new();
        let mut rng = SmallRng::seed_from_u64(0);
        let mut io = Peripherals {
            keypad: &[false; 16],
            timers: &timers,
            rng: &mut rng,
            quirks: Quirks::default(),
            strict: true,
        };
        let op = Opcode::new(0xFFFF);
        let err = execute(Instruction::Unknown(op), &State::new(), &mut io).unwrap_err();
        assert!(matches!(
            err,
            Chip8Error::UnknownOpcode {
                address: 0x200,
                ..
            }
        ));
    }
}
