/// Rendering seam the synchronization core depends on.
///
/// Implementations own the presentation entirely (terminal, GUI list,
/// test recorder); the core only ever pushes text through these two calls.
pub trait DisplaySink: Send + Sync {
    /// A new transcript message, in server order.
    fn render_message(&self, text: &str);

    /// A recoverable failure the user should see.
    fn render_error(&self, text: &str);
}
