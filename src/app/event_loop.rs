use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::debounce::Debouncer;

const RESIZE_DEBOUNCE_MS: u64 = 100;
const IDLE_POLL_MS: u64 = 250;

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be read or parsed, or if terminal
    /// initialization or the event loop hits an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        let page = self.load_page()?;

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; apiref requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);

        let mut model = self.prepare_model(page, (size.width, size.height));

        let _ = execute!(std::io::stdout(), EnableMouseCapture);
        let result = self.event_loop(&mut terminal, &mut model);

        let _ = execute!(std::io::stdout(), DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn event_loop(&self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let elapsed_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut search_debouncer: Debouncer<()> = Debouncer::new(self.debounce_ms);
        let mut resize_debouncer: Debouncer<(u16, u16)> = Debouncer::new(RESIZE_DEBOUNCE_MS);
        let mut needs_render = true;

        loop {
            let now_ms = elapsed_ms();

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }
            if Self::fire_ready_search(model, &mut search_debouncer, now_ms) {
                needs_render = true;
            }

            if needs_render {
                let _frame_scope = crate::perf::scope("frame.draw");
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }
            if model.should_quit {
                break;
            }

            // Sleep until input arrives or the nearest debounce is due.
            let poll_ms = [
                search_debouncer.remaining_ms(now_ms),
                resize_debouncer.remaining_ms(now_ms),
            ]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(IDLE_POLL_MS);
            if !event::poll(Duration::from_millis(poll_ms))? {
                continue;
            }

            // Coalesce key repeat bursts into a single render.
            loop {
                let event_ms = elapsed_ms();
                let msg =
                    Self::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer);
                if let Some(msg) = msg {
                    Self::dispatch(model, &mut search_debouncer, msg, event_ms);
                    needs_render = true;
                }
                if model.should_quit || !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }
        Ok(())
    }
}
