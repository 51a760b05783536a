use crate::error::Result;
use crate::hcioctl::Operation;

/// Carries one synchronous control call to a board.
pub trait Transport {
    /// Sends `input` for `op` and fills `output` with the reply.
    /// Returns the number of reply bytes written.
    fn control(&mut self, op: Operation, input: &[u8], output: &mut [u8]) -> Result<usize>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn control(&mut self, op: Operation, input: &[u8], output: &mut [u8]) -> Result<usize> {
        (**self).control(op, input, output)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn control(&mut self, op: Operation, input: &[u8], output: &mut [u8]) -> Result<usize> {
        (**self).control(op, input, output)
    }
}
