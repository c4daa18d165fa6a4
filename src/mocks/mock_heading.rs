// Scripted heading source for reconciler tests.

use std::cell::Cell;
use std::collections::VecDeque;
use std::error::Error;
use std::rc::Rc;

use crate::orientation::{Access, HeadingSource};

pub struct MockHeadingSource {
    access: Access,
    fail_start: bool,
    samples: VecDeque<f64>,
    stops: Rc<Cell<usize>>,
}

impl MockHeadingSource {
    /// A source that grants access and replays `samples` in order.
    /// The returned counter records how often `stop` ran.
    pub fn granted(samples: &[f64]) -> (Self, Rc<Cell<usize>>) {
        Self::with_access(samples, Access::Granted)
    }

    pub fn with_access(samples: &[f64], access: Access) -> (Self, Rc<Cell<usize>>) {
        let stops = Rc::new(Cell::new(0));
        (
            Self {
                access,
                fail_start: false,
                samples: samples.iter().copied().collect(),
                stops: Rc::clone(&stops),
            },
            stops,
        )
    }

    /// Grants access but errors on the subscribe attempt.
    pub fn failing_start() -> (Self, Rc<Cell<usize>>) {
        let (mut source, stops) = Self::granted(&[]);
        source.fail_start = true;
        (source, stops)
    }
}

impl HeadingSource for MockHeadingSource {
    fn request_access(&mut self) -> Access {
        self.access
    }

    fn start(&mut self) -> Result<(), Box<dyn Error>> {
        if self.fail_start {
            return Err("mock subscribe failure".into());
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.stops.set(self.stops.get() + 1);
    }

    fn read_sample(&mut self) -> Option<f64> {
        self.samples.pop_front()
    }
}
