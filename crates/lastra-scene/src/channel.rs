use std::sync::mpsc;

use lastra_io::OutputEncoding;

use crate::{
    cancel::CancelToken,
    event::RenderEvent,
    render::{RenderRequest, Renderer},
};

/// Run a render job on its own thread and stream its events over a channel.
///
/// The channel closes after the terminal event. Dropping the receiver cancels
/// the job before its next variant.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use lastra_io::OutputEncoding;
/// use lastra_scene::{spawn_render, CancelToken, RenderRequest, Renderer, TemplateStore};
///
/// let renderer = Renderer::with_builtin_catalog(Arc::new(TemplateStore::new()), Default::default())?;
/// let photo = std::fs::read("slab.jpg")?;
/// let events = spawn_render(
///     renderer,
///     RenderRequest::new(photo, "easel-single"),
///     OutputEncoding::Png,
///     CancelToken::new(),
/// );
/// for event in events {
///     println!("{}", serde_json::to_string(&event)?);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn spawn_render(
    renderer: Renderer,
    request: RenderRequest,
    encoding: OutputEncoding,
    cancel: CancelToken,
) -> mpsc::Receiver<RenderEvent> {
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let scene_id = request.scene_id.clone();
        let job = renderer.render(request, encoding, cancel.clone());
        for event in job {
            if tx.send(event).is_err() {
                log::debug!("receiver for scene `{scene_id}` dropped, cancelling");
                cancel.cancel();
                break;
            }
        }
    });

    rx
}
