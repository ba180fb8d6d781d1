// The route surface. Two logical routes exist: the contest overview and a
// catch-all that redirects to it.

use log::info;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Route {
    ContestOverview,
}

/// Maps a route path to the view to display. Unmatched paths redirect to the
/// contest overview.
pub fn resolve(path: &str) -> Route {
    match path {
        "/contests" | "/" | "" => Route::ContestOverview,
        other => {
            info!("resolve: unknown route {:?}, redirecting to /contests", other);
            Route::ContestOverview
        }
    }
}
