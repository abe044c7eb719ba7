//! GameView: maps a [`Session`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{FallingPiece, Playfield, Session};
use crate::fb::{FrameBuffer, Glyph, Rgb, Style};
use crate::types::{SpinType, Tetromino, HEIGHT, VISIBLE_HEIGHT, WIDTH};

/// First grid row shown on screen
const FIRST_VISIBLE_ROW: usize = HEIGHT - VISIBLE_HEIGHT;

const WELL_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Screen position of the top-left corner of the well's border
#[derive(Debug, Clone, Copy)]
struct Origin {
    x: u16,
    y: u16,
}

/// A lightweight terminal view of a single-player session.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, session: &Session, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::BLANK);

        let field = session.playfield();
        let well_w = WIDTH as u16 * self.cell_w;
        let well_h = VISIBLE_HEIGHT as u16 * self.cell_h;
        let frame_w = well_w + 2;
        let frame_h = well_h + 2;

        let origin = Origin {
            x: viewport.width.saturating_sub(frame_w) / 2,
            y: viewport.height.saturating_sub(frame_h) / 2,
        };

        fb.fill_rect(
            origin.x + 1,
            origin.y + 1,
            well_w,
            well_h,
            ' ',
            Style::new(Rgb::new(80, 80, 90), WELL_BG),
        );
        draw_border(
            fb,
            origin,
            frame_w,
            frame_h,
            Style::new(Rgb::new(200, 200, 200), PANEL_BG),
        );

        self.draw_grid(fb, origin, field);

        let ghost_style = Style::new(Rgb::new(140, 140, 140), WELL_BG).dim();
        self.draw_piece(fb, origin, &field.ghost_piece(), |_| ('░', ghost_style));
        self.draw_piece(fb, origin, field.falling_piece(), |kind| {
            ('█', piece_style(kind))
        });

        self.draw_side_panel(fb, viewport, origin, frame_w, field);

        if session.is_paused() {
            draw_overlay(fb, origin, frame_w, frame_h, "PAUSED", "Q quit");
        } else if field.lost() {
            draw_overlay(fb, origin, frame_w, frame_h, "GAME OVER", "R retry  Q quit");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, session: &Session, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(session, viewport, &mut fb);
        fb
    }

    fn draw_grid(&self, fb: &mut FrameBuffer, origin: Origin, field: &Playfield) {
        let empty = Style::new(Rgb::new(90, 90, 100), WELL_BG).dim();
        for (row, cells) in field.grid().visible_rows().iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let (ch, style) = match cell {
                    Some(kind) => ('█', piece_style(*kind)),
                    None => ('·', empty),
                };
                self.fill_cell(fb, origin, col as u16, row as u16, ch, style);
            }
        }
    }

    /// Draw the visible part of a piece; rows in the spawn buffer are skipped
    fn draw_piece(
        &self,
        fb: &mut FrameBuffer,
        origin: Origin,
        piece: &FallingPiece,
        look: impl Fn(Tetromino) -> (char, Style),
    ) {
        let (ch, style) = look(piece.tetromino);
        for (x, y) in piece.cells() {
            if x < 0 || x as usize >= WIDTH || y < FIRST_VISIBLE_ROW as i8 || y as usize >= HEIGHT {
                continue;
            }
            let row = (y as usize - FIRST_VISIBLE_ROW) as u16;
            self.fill_cell(fb, origin, x as u16, row, ch, style);
        }
    }

    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        origin: Origin,
        col: u16,
        row: u16,
        ch: char,
        style: Style,
    ) {
        let px = origin.x + 1 + col * self.cell_w;
        let py = origin.y + 1 + row * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        viewport: Viewport,
        origin: Origin,
        frame_w: u16,
        field: &Playfield,
    ) {
        let panel_x = origin.x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = Style::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = Style::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = origin.y;
        fb.put_str(panel_x, y, "HOLD", label);
        y = y.saturating_add(1);
        match field.holding_piece() {
            Some(kind) => {
                let style = if field.can_swap() {
                    piece_style(kind)
                } else {
                    piece_style(kind).dim()
                };
                fb.put_str(panel_x, y, kind.as_str(), style);
            }
            None => fb.put_str(panel_x, y, "-", value),
        }
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        for kind in field.next_pieces() {
            fb.put_str(panel_x, y, kind.as_str(), piece_style(kind));
            y = y.saturating_add(1);
        }
        y = y.saturating_add(1);

        for (name, number) in [
            ("SCORE", field.score()),
            ("COMBO", u64::from(field.combo())),
            ("B2B", u64::from(field.b2b())),
        ] {
            fb.put_str(panel_x, y, name, label);
            y = y.saturating_add(1);
            fb.put_number(panel_x, y, number, value);
            y = y.saturating_add(2);
        }

        let message = field.message();
        if message.is_visible() {
            let highlight = Style::new(Rgb::new(255, 230, 120), PANEL_BG).bold();
            match message.spin {
                SpinType::Proper => fb.put_str(panel_x, y, "T-SPIN", highlight),
                SpinType::Mini => fb.put_str(panel_x, y, "T-SPIN MINI", highlight),
                SpinType::None => {}
            }
            y = y.saturating_add(1);
            fb.put_str(panel_x, y, message.kind.as_str(), highlight);
        }
    }
}

fn piece_style(kind: Tetromino) -> Style {
    let fg = match kind {
        Tetromino::I => Rgb::new(80, 220, 220),
        Tetromino::O => Rgb::new(240, 220, 80),
        Tetromino::T => Rgb::new(200, 120, 220),
        Tetromino::S => Rgb::new(100, 220, 120),
        Tetromino::Z => Rgb::new(220, 80, 80),
        Tetromino::J => Rgb::new(80, 120, 220),
        Tetromino::L => Rgb::new(255, 165, 0),
    };
    Style::new(fg, WELL_BG).bold()
}

fn draw_border(fb: &mut FrameBuffer, origin: Origin, w: u16, h: u16, style: Style) {
    if w < 2 || h < 2 {
        return;
    }
    let Origin { x, y } = origin;

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_overlay(fb: &mut FrameBuffer, origin: Origin, frame_w: u16, frame_h: u16, title: &str, hint: &str) {
    let style = Style::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
    let mid_y = origin.y.saturating_add(frame_h / 2);
    for (dy, text) in [(0, title), (1, hint)] {
        let text_w = text.chars().count() as u16;
        let x = origin.x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        fb.put_str(x, mid_y.saturating_add(dy), text, style);
    }
}
