/// Plotting layer: reporters describe figures, renderers draw them.
///
/// ```text
///   reporter ──► figure::* builders ──► Figure ──► Renderer::render ──► .png
/// ```
pub mod figure;
pub mod render;

pub use figure::Figure;
pub use render::{BitmapRenderer, Renderer};

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::render::PlotError;
    use super::{Figure, Renderer};

    /// Keeps every figure it is asked to draw and leaves an empty file at
    /// the target path, so file-set assertions work without rasterizing.
    #[derive(Default)]
    pub struct RecordingRenderer {
        pub rendered: RefCell<Vec<(PathBuf, Figure)>>,
    }

    impl RecordingRenderer {
        pub fn paths(&self) -> Vec<PathBuf> {
            self.rendered.borrow().iter().map(|(p, _)| p.clone()).collect()
        }

        /// Figure written to the file named `file_name`, if any.
        pub fn figure(&self, file_name: &str) -> Option<Figure> {
            self.rendered
                .borrow()
                .iter()
                .find(|(p, _)| p.file_name().is_some_and(|n| n == file_name))
                .map(|(_, f)| f.clone())
        }
    }

    impl Renderer for RecordingRenderer {
        fn render(&self, figure: &Figure, path: &Path) -> Result<(), PlotError> {
            fs::write(path, b"")?;
            self.rendered
                .borrow_mut()
                .push((path.to_path_buf(), figure.clone()));
            Ok(())
        }
    }
}
