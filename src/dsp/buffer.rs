/// Fixed-capacity ring of the most recent capture samples.
///
/// Decouples irregular capture delivery from the fixed-size FFT window: the
/// producer appends blocks of any length, the analyzer reads back exactly
/// `capacity` samples each tick. Reads are non-destructive; only the newest
/// window matters. Before `capacity` samples have ever arrived the missing
/// prefix reads as zeros.
pub struct SampleBuffer {
    data: Vec<f32>,
    head: usize,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity],
            head: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Append captured samples, overwriting the oldest when full.
    /// Never blocks, never rejects.
    pub fn push(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.data[self.head] = sample;
            self.head = (self.head + 1) % self.data.len();
        }
    }

    /// Copy the `capacity` most recent samples, oldest first, into `out`.
    /// `out` must be exactly `capacity` long.
    pub fn write_latest(&self, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.data.len());
        let tail_len = self.data.len() - self.head;
        out[..tail_len].copy_from_slice(&self.data[self.head..]);
        out[tail_len..].copy_from_slice(&self.data[..self.head]);
    }

    pub fn latest_window(&self) -> Vec<f32> {
        let mut out = vec![0.0; self.data.len()];
        self.write_latest(&mut out);
        out
    }

    pub fn clear(&mut self) {
        self.data.fill(0.0);
        self.head = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unprimed_window_is_zero_padded() {
        let mut buffer = SampleBuffer::new(4);
        buffer.push(&[1.0, 2.0]);
        assert_eq!(buffer.latest_window(), vec![0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn overflow_keeps_newest_in_order() {
        let mut buffer = SampleBuffer::new(4);
        buffer.push(&[1.0, 2.0, 3.0]);
        buffer.push(&[4.0, 5.0, 6.0]);
        let window = buffer.latest_window();
        assert_eq!(window.len(), 4);
        assert_eq!(window, vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn push_larger_than_capacity() {
        let mut buffer = SampleBuffer::new(3);
        buffer.push(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(buffer.latest_window(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn reads_are_non_destructive() {
        let mut buffer = SampleBuffer::new(2);
        buffer.push(&[7.0, 8.0]);
        assert_eq!(buffer.latest_window(), buffer.latest_window());
    }

    #[test]
    fn clear_resets_to_silence() {
        let mut buffer = SampleBuffer::new(3);
        buffer.push(&[1.0, 2.0, 3.0]);
        buffer.clear();
        assert_eq!(buffer.latest_window(), vec![0.0; 3]);
    }
}
