use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
pub const DISPLAY_CELLS: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

/// The interpreter-side framebuffer: a 64x32 grid of monochrome cells,
/// mutated only by XOR sprite drawing and wholesale clearing. There is no
/// double buffering; renderers read the cells between ticks.
pub struct FrameBuffer {
    cells: [bool; DISPLAY_CELLS],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            cells: [false; DISPLAY_CELLS],
        }
    }

    pub fn clear(&mut self) {
        self.cells = [false; DISPLAY_CELLS];
    }

    /// XOR one cell; returns the previous state, i.e. whether a lit pixel
    /// was overdrawn (the collision signal)
    pub fn flip(&mut self, x: usize, y: usize) -> bool {
        let index = x + y * DISPLAY_WIDTH;
        let was_set = self.cells[index];
        self.cells[index] = !was_set;
        was_set
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[x + y * DISPLAY_WIDTH]
    }

    pub fn cells(&self) -> &[bool; DISPLAY_CELLS] {
        &self.cells
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        FrameBuffer::new()
    }
}

/// Display is used by the host shell to draw the framebuffer on a screen.
/// It should abstract the implementation details, so a variety of kinds of
/// screen would work.
pub trait Display {
    /// render a full frame of cells (row-major, 64x32)
    fn draw(&mut self, cells: &[bool]) -> Result<(), io::Error>;

    /// how many cells a frame should contain
    fn get_display_size(&mut self) -> usize;
}

// store useful metadata about the terminal
struct Resolution(usize, usize);

impl Resolution {
    fn pixel_count(&self) -> usize {
        self.0 * self.1
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// expand cells in the given state into x, y float coords, suitable for
    /// rendering with TUI
    fn points_with_state<'a>(
        &self,
        cells: &'a [bool],
        lit: bool,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let mut count = self.pixel_count();
        let w = self.0;
        std::iter::from_fn(move || {
            while count > 0 {
                count -= 1;
                if cells[count] == lit {
                    return Some((
                        (count % w) as f64,        // x
                        -1.0 * (count / w) as f64, // y
                    ));
                }
            }
            None
        })
    }
}

/// monochrome display in a terminal, rendered using TUI and Crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new(x: usize, y: usize) -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(x, y),
        })
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, cells: &[bool]) -> Result<(), io::Error> {
        // make sure we're given exactly the right amount of data to draw
        assert_eq!(
            cells.len(),
            self.resolution.pixel_count(),
            "MonoTermDisplay must have correct-sized data to draw"
        );

        // for now this assumes a 1:1 ratio between terminal, chip8 and the
        // internal TUI canvas
        self.terminal.draw(|f| {
            let size = Rect::new(
                0,
                0,
                2 + self.resolution.0 as u16,
                2 + self.resolution.1 as u16,
            );

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(self.resolution.x_bounds())
                .y_bounds(self.resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &self
                            .resolution
                            .points_with_state(cells, false)
                            .collect::<Vec<_>>(),
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &self
                            .resolution
                            .points_with_state(cells, true)
                            .collect::<Vec<_>>(),
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }

    fn get_display_size(&mut self) -> usize {
        self.resolution.pixel_count()
    }
}

/// useful for testing non-display routines
pub struct DummyDisplay;

impl DummyDisplay {
    #[allow(dead_code)]
    pub fn new() -> Result<DummyDisplay, io::Error> {
        Ok(DummyDisplay {})
    }
}

impl Display for DummyDisplay {
    #[allow(unused)]
    fn draw(&mut self, cells: &[bool]) -> Result<(), io::Error> {
        Ok(())
    }
    fn get_display_size(&mut self) -> usize {
        DISPLAY_CELLS
    }
}
