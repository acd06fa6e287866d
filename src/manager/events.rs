//! Notifications delivered to render and camera collaborators.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::Vec3;

use crate::colormap::Colormap;
use crate::message::Side;

/// Something the manager committed.
#[derive(Debug, Clone, PartialEq)]
pub enum AtlasEvent {
    /// The reference atlas finished its one-time bootstrap.
    AtlasLoaded {
        /// Internal atlas name.
        name: String,
    },
    /// The reference coordinate was pushed to the geometry provider.
    ReferenceCoordSet {
        /// New scene origin.
        coord: Vec3,
    },
    /// One side of a structure was shown or hidden.
    NodeVisibilityChanged {
        /// Structure ID.
        id: i32,
        /// Side that changed.
        side: Side,
        /// New visibility.
        visible: bool,
    },
    /// A direct load request finished applying visibility to a structure.
    NodeVisible {
        /// Structure ID.
        id: i32,
    },
    /// Colormap mode or mapping changed. Already-visible structures keep
    /// their colors.
    ColormapChanged {
        /// Mapping designated for colormap mode.
        colormap: Colormap,
        /// Whether colormap mode is on.
        enabled: bool,
        /// Declared data minimum.
        min: f32,
        /// Declared data maximum.
        max: f32,
    },
    /// Every tracked structure was reset and hidden.
    Cleared,
}

type Listener = Rc<dyn Fn(&AtlasEvent)>;

/// Registered observers. Cheap to clone; clones share the listener list so
/// background load tasks can notify after the call that spawned them.
#[derive(Clone, Default)]
pub(crate) struct Listeners {
    inner: Rc<RefCell<Vec<Listener>>>,
}

impl Listeners {
    pub(crate) fn subscribe(&self, listener: impl Fn(&AtlasEvent) + 'static) {
        self.inner.borrow_mut().push(Rc::new(listener));
    }

    /// Deliver `event` to every listener. Listeners may subscribe further
    /// observers while being notified.
    pub(crate) fn emit(&self, event: &AtlasEvent) {
        let listeners: Vec<Listener> = self.inner.borrow().clone();
        for listener in listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.inner.borrow().len())
            .finish()
    }
}
