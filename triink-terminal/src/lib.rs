/// Terminal front end for the TriInk viewer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use triink_core::{DrawSurface, Vec3, Viewer, Viewport};

pub mod renderer;

pub use renderer::CellSurface;

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f64 = 2.0;

/// Rows reserved for the status overlay
const OVERLAY_ROWS: u16 = 3;

/// Drag distance in pixels that one terminal column stands for
const CELL_DRAG_PIXELS: f64 = 8.0;

/// Default file names for the in-session exports
pub const VERTEX_FACE_FILE: &str = "mesh_vf_export.txt";
pub const INSERTER_FILE: &str = "scene_inserter.txt";

/// Main application struct for terminal rendering
pub struct TerminalApp {
    viewer: Viewer,
    surface: CellSurface,
    export_dir: PathBuf,
    running: bool,
    drag_origin: Option<(u16, u16)>,
    status: String,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(viewer: Viewer, export_dir: PathBuf) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            viewer,
            surface: CellSurface::new(
                width as usize,
                height.saturating_sub(OVERLAY_ROWS) as usize,
            ),
            export_dir,
            running: true,
            drag_origin: None,
            status: String::new(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        let mut previous = Instant::now();

        while self.running {
            let frame_start = Instant::now();
            let dt = (frame_start - previous).as_secs_f64().min(0.05);
            previous = frame_start;

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?, dt)?;
            }

            // Update
            self.viewer.tick(dt);

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event, dt: f64) -> io::Result<()> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key, dt),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                self.surface
                    .resize(width as usize, height.saturating_sub(OVERLAY_ROWS) as usize);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, KeyEvent { code, modifiers, .. }: KeyEvent, dt: f64) {
        // Terminals report presses only, so each press moves a whole frame's worth
        let step = dt.max(1.0 / 30.0);
        match code {
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char('w') => self.viewer.travel(Vec3::new(0.0, 0.0, -1.0), step),
            KeyCode::Char('s') => self.viewer.travel(Vec3::new(0.0, 0.0, 1.0), step),
            KeyCode::Char('a') => self.viewer.travel(Vec3::new(-1.0, 0.0, 0.0), step),
            KeyCode::Char('d') => self.viewer.travel(Vec3::new(1.0, 0.0, 0.0), step),
            KeyCode::Char('q') => self.viewer.travel(Vec3::new(0.0, 1.0, 0.0), step),
            KeyCode::Char('e') => self.viewer.travel(Vec3::new(0.0, -1.0, 0.0), step),
            KeyCode::Up => self.viewer.drag(0.0, -CELL_DRAG_PIXELS),
            KeyCode::Down => self.viewer.drag(0.0, CELL_DRAG_PIXELS),
            KeyCode::Left => self.viewer.drag(-CELL_DRAG_PIXELS, 0.0),
            KeyCode::Right => self.viewer.drag(CELL_DRAG_PIXELS, 0.0),
            KeyCode::Char('+') => self.viewer.zoom(-1.0),
            KeyCode::Char('-') => self.viewer.zoom(1.0),
            KeyCode::Char('r') => self.viewer.reset_view(),
            KeyCode::Char('c') => self.viewer.toggle_colors(),
            KeyCode::Char('b') => self.viewer.toggle_cull(),
            KeyCode::Char(' ') => self.viewer.toggle_auto_rotate(),
            KeyCode::Char('x') => {
                let text = self.viewer.export_vertex_face();
                self.write_export(VERTEX_FACE_FILE, &text);
            }
            KeyCode::Char('i') => {
                let text = self.viewer.export_scene_inserter();
                self.write_export(INSERTER_FILE, &text);
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_origin = Some((mouse.column, mouse.row));
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((column, row)) = self.drag_origin {
                    let dx = (mouse.column as f64 - column as f64) * CELL_DRAG_PIXELS;
                    let dy = (mouse.row as f64 - row as f64) * CELL_DRAG_PIXELS * CELL_ASPECT;
                    self.viewer.drag(dx, dy);
                }
                self.drag_origin = Some((mouse.column, mouse.row));
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag_origin = None,
            MouseEventKind::ScrollDown => self.viewer.zoom(1.0),
            MouseEventKind::ScrollUp => self.viewer.zoom(-1.0),
            _ => {}
        }
    }

    fn write_export(&mut self, name: &str, text: &str) {
        let path = self.export_dir.join(name);
        self.status = match std::fs::write(&path, text) {
            Ok(()) => format!("Wrote {}", path.display()),
            Err(err) => {
                tracing::error!(path = %path.display(), %err, "export failed");
                format!("Export failed: {err}")
            }
        };
    }

    fn render(&mut self) -> io::Result<()> {
        let viewport = Viewport::new(self.surface.width() as f64, self.surface.height() as f64)
            .with_cell_aspect(CELL_ASPECT);

        let mut stdout = stdout();

        if self.viewer.mesh().is_empty() {
            self.surface.clear();
            queue!(
                stdout,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(2, OVERLAY_ROWS + 1),
                SetForegroundColor(Color::DarkGrey),
                Print("Load an OBJ to render it"),
                ResetColor
            )?;
        } else {
            self.viewer.frame(&viewport).draw(&mut self.surface);
            self.surface.draw(&mut stdout, OVERLAY_ROWS)?;
        }

        // Draw UI overlay
        let overlay = format!(
            "{} | FPS: {:.1}\nDrag/arrows rotate, wheel/+- zoom, WASDQE move, R reset, C colors, B cull, Space auto, X/I export, Esc quit\n{}",
            self.viewer.overlay_text().replace('\n', " | "),
            self.fps,
            self.status
        );
        queue!(stdout, SetForegroundColor(Color::Yellow))?;
        for (row, line) in overlay.lines().enumerate() {
            queue!(
                stdout,
                cursor::MoveTo(0, row as u16),
                terminal::Clear(ClearType::CurrentLine),
                Print(line)
            )?;
        }
        queue!(stdout, ResetColor)?;

        stdout.flush()?;
        Ok(())
    }
}
