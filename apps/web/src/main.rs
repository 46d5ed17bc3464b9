mod feed;
mod render;
mod state;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen_futures::spawn_local;

use crate::state::{KeyOutcome, WebState};

fn main() -> io::Result<()> {
    let state = Rc::new(RefCell::new(WebState::new()));

    spawn_local(feed::load_boundary(Rc::clone(&state)));

    let refresher = match feed::Refresher::start(&state) {
        Ok(refresher) => Some(refresher),
        Err(error) => {
            web_sys::console::error_1(&error);
            None
        }
    };

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let state = Rc::clone(&state);
        move |event| {
            let outcome = state.borrow_mut().handle_key(event.code);
            if outcome == KeyOutcome::Refresh {
                spawn_local(feed::refresh(Rc::clone(&state)));
            }
        }
    });

    terminal.draw_web(move |f| {
        // The refresher lives as long as the page keeps drawing.
        let _ = &refresher;
        render::draw(&state.borrow(), f);
    });

    Ok(())
}
