//! Native screen seams implemented by the host UI layer.

use crate::controller::ChatSurface;
use crate::header::HeaderModel;

/// Invoked once a presentation animation has finished.
pub type PresentCompletion = Box<dyn FnOnce() + Send + 'static>;

/// How a modally presented chat screen covers the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationStyle {
    #[default]
    FullScreen,
    PageSheet,
}

/// The native screen hosting one chat surface: a header above the web view.
///
/// All calls come from the surface controller task, one at a time. Hosts
/// whose toolkit requires a main thread hop there inside the implementation.
pub trait SurfaceView: Send + Sync {
    /// Draw (or redraw) the header.
    fn render_header(&self, header: &HeaderModel);

    /// Remove the screen. Called at most once per surface.
    fn dismiss(&self, animated: bool);
}

/// Host navigation: shows a chat surface modally or on a navigation stack.
///
/// Implementations build the native screen and web view (registering a
/// message handler for each name in
/// [`BRIDGE_CHANNELS`](core_protocol::BRIDGE_CHANNELS)), then call
/// [`ChatSurface::attach`].
pub trait SurfacePresenter: Send + Sync {
    fn present(
        &self,
        surface: ChatSurface,
        style: PresentationStyle,
        animated: bool,
        completion: Option<PresentCompletion>,
    );

    fn push(&self, surface: ChatSurface, animated: bool);
}
