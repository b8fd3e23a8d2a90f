/// Monotonic request counter owned by one view.
///
/// Every fetch a view issues is tagged with the value returned by `advance`.
/// A response is applied only while its tag is still the current one, so a
/// slow reply to a superseded request can never overwrite fresher state.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestGeneration(u64);

impl RequestGeneration {
    /// Start a new request, superseding every earlier one.
    pub fn advance(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(1);
        self.0
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.0 == generation
    }
}
