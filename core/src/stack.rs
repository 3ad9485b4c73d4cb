use crate::constants::STACK_DEPTH;
use crate::error::StackFault;

/// # Call stack
/// Stores return addresses when subroutines are called.
/// Holds at most `STACK_DEPTH` addresses; pushing onto a full stack or popping an
/// empty one is a fault rather than a silent wrap.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Stack {
    addresses: [u16; STACK_DEPTH],
    sp: u8,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of return addresses currently stored
    pub fn depth(&self) -> usize {
        self.sp as usize
    }

    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }

    pub fn push(&mut self, address: u16) -> Result<(), StackFault> {
        let slot = self
            .addresses
            .get_mut(self.sp as usize)
            .ok_or(StackFault::Overflow)?;
        *slot = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, StackFault> {
        if self.sp == 0 {
            return Err(StackFault::Underflow);
        }
        self.sp -= 1;
        Ok(self.addresses[self.sp as usize])
    }

    /// The address a RET would jump to
    pub fn peek(&self) -> Option<u16> {
        self.sp
            .checked_sub(1)
            .map(|top| self.addresses[top as usize])
    }
}
