//! Circular image widget
//!
//! An image clipped to a circle, with an optional ring border and a
//! press-toggled selection state. The clip is composited in software and the
//! renderer receives a finished texture, so the widget works the same on
//! every backend.

use iced::advanced::image::{self, Handle};
use iced::advanced::layout;
use iced::advanced::renderer;
use iced::advanced::widget::tree::{self, Tree};
use iced::advanced::{Clipboard, Layout, Shell, Widget};
use iced::border::Border;
use iced::mouse;
use iced::touch;
use iced::window;
use iced::{Color, Element, Event, Length, Point, Rectangle, Size, Theme};

use crate::geometry;
use crate::source::Source;
use crate::texture::{self, Raster, TextureSampler};

/// Create a circular image widget displaying the given source.
pub fn circle_image<Message>(source: Source) -> CircleImage<Message> {
    CircleImage::new().image(source)
}

/// A widget rendering an image clipped to a circle.
///
/// The circle fills the largest square that fits the widget's bounds. An
/// optional ring is stroked around it, colored [`Style::border_color`] or
/// [`Style::selected_color`] depending on the selection flag, which toggles
/// on press while the widget is interactive.
pub struct CircleImage<Message> {
    source: Option<Source>,
    style: Style,
    interactive: bool,
    on_selected: Option<Message>,
    on_unselected: Option<Message>,
    width: Length,
    height: Length,
}

impl<Message> CircleImage<Message> {
    /// Create an empty widget; only the background circle is drawn until an
    /// image is assigned.
    pub fn new() -> Self {
        Self {
            source: None,
            style: Style::default(),
            interactive: false,
            on_selected: None,
            on_unselected: None,
            width: Length::Fill,
            height: Length::Fill,
        }
    }

    /// Assign the image to display, replacing any previous one.
    pub fn image(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Replace the whole appearance bundle.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Fill behind the circle, visible through image transparency.
    pub fn background(mut self, color: Color) -> Self {
        self.style.background = color;
        self
    }

    /// Stroke a ring around the circle.
    pub fn bordered(mut self, border: bool) -> Self {
        self.style.border = border;
        self
    }

    /// Ring color while not selected.
    pub fn border_color(mut self, color: Color) -> Self {
        self.style.border_color = color;
        self
    }

    /// Ring stroke width in logical pixels.
    pub fn border_width(mut self, width: f32) -> Self {
        self.style.border_width = width;
        self
    }

    /// Ring color while selected.
    pub fn selected_color(mut self, color: Color) -> Self {
        self.style.selected_color = color;
        self
    }

    /// Let presses toggle the selection flag. Off by default; a widget that
    /// is not interactive also drops any selection it still holds.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Message published when a press selects the widget.
    pub fn on_selected(mut self, message: Message) -> Self {
        self.on_selected = Some(message);
        self
    }

    /// Message published when a press clears the selection.
    pub fn on_unselected(mut self, message: Message) -> Self {
        self.on_unselected = Some(message);
        self
    }

    pub fn width(mut self, width: impl Into<Length>) -> Self {
        self.width = width.into();
        self
    }

    pub fn height(mut self, height: impl Into<Length>) -> Self {
        self.height = height.into();
        self
    }

    fn stroke_width(&self) -> Option<f32> {
        self.style.border.then_some(self.style.border_width)
    }

    /// Per-pass bookkeeping: recompute the drawing region and rebuild the
    /// sampler and texture when the region, the source, or the mask changed.
    fn prepare(&self, state: &mut State, bounds: Rectangle) {
        let key = self.source.as_ref().map(Source::cache_key);
        let source_changed = key != state.source_key;
        if source_changed {
            state.source_key = key;
            state.raster = self.source.as_ref().and_then(Source::rasterize);
        }

        let side = geometry::min_canvas_side(bounds.width, bounds.height);
        state.min_side = side;

        let sampler = state
            .raster
            .as_ref()
            .map(|raster| TextureSampler::fit(side, raster));
        let radius = geometry::fill_radius(side, self.stroke_width());
        if source_changed || sampler != state.sampler || radius != state.mask_radius {
            state.rebuild_texture(radius);
        }
    }
}

impl<Message> Default for CircleImage<Message> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Message, Renderer> Widget<Message, Theme, Renderer> for CircleImage<Message>
where
    Message: Clone,
    Renderer: iced::advanced::Renderer + image::Renderer<Handle = Handle>,
{
    fn tag(&self) -> tree::Tag {
        tree::Tag::of::<State>()
    }

    fn state(&self) -> tree::State {
        tree::State::new(State::default())
    }

    fn size(&self) -> Size<Length> {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    fn layout(
        &mut self,
        _tree: &mut Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        layout::atomic(limits, self.width, self.height)
    }

    fn update(
        &mut self,
        tree: &mut Tree,
        event: &Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, Message>,
        _viewport: &Rectangle,
    ) {
        let state = tree.state.downcast_mut::<State>();
        let bounds = layout.bounds();

        if let Event::Window(window::Event::RedrawRequested(_now)) = event {
            self.prepare(state, bounds);
            return;
        }

        // Pointer events are never captured, so the surrounding widgets keep
        // their click and gesture semantics.
        if is_pointer(event) && cursor.is_over(bounds) {
            if let Some(notify) = apply_pointer(state, self.interactive, is_press_down(event)) {
                let hook = match notify {
                    Notify::Selected => self.on_selected.clone(),
                    Notify::Unselected => self.on_unselected.clone(),
                };
                if let Some(message) = hook {
                    shell.publish(message);
                }
            }
            shell.request_redraw();
        }
    }

    fn draw(
        &self,
        tree: &Tree,
        renderer: &mut Renderer,
        _theme: &Theme,
        _style: &renderer::Style,
        layout: Layout<'_>,
        _cursor: mouse::Cursor,
        viewport: &Rectangle,
    ) {
        let state = tree.state.downcast_ref::<State>();
        let bounds = layout.bounds();

        let side = geometry::min_canvas_side(bounds.width, bounds.height);
        if side <= 0.0 {
            return;
        }

        let circle = geometry::resolve(bounds.width, bounds.height, self.stroke_width());
        let center = Point::new(bounds.x + circle.center_x, bounds.y + circle.center_y);
        let region = Rectangle {
            x: center.x - side / 2.0,
            y: center.y - side / 2.0,
            width: side,
            height: side,
        };

        if self.style.border {
            let ring = geometry::ring_color(
                self.style.border_color,
                self.style.selected_color,
                state.is_selected,
            );
            renderer.fill_quad(
                renderer::Quad {
                    bounds: region,
                    border: Border {
                        radius: (side / 2.0).into(),
                        width: self.style.border_width,
                        color: ring,
                    },
                    ..renderer::Quad::default()
                },
                Color::TRANSPARENT,
            );
        }

        renderer.fill_quad(
            renderer::Quad {
                bounds: Rectangle {
                    x: center.x - circle.radius,
                    y: center.y - circle.radius,
                    width: circle.radius * 2.0,
                    height: circle.radius * 2.0,
                },
                border: Border {
                    radius: circle.radius.into(),
                    ..Border::default()
                },
                ..renderer::Quad::default()
            },
            self.style.background,
        );

        if let Some(texture) = &state.texture {
            renderer.draw_image(image::Image::new(texture.clone()), region, *viewport);
        }
    }

    fn mouse_interaction(
        &self,
        _tree: &Tree,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        _viewport: &Rectangle,
        _renderer: &Renderer,
    ) -> mouse::Interaction {
        if self.interactive && cursor.is_over(layout.bounds()) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

impl<'a, Message, Renderer> From<CircleImage<Message>> for Element<'a, Message, Theme, Renderer>
where
    Message: Clone + 'a,
    Renderer: iced::advanced::Renderer + image::Renderer<Handle = Handle> + 'a,
{
    fn from(widget: CircleImage<Message>) -> Element<'a, Message, Theme, Renderer> {
        Element::new(widget)
    }
}

/// Appearance of a [`CircleImage`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Fill behind the circle, visible through image transparency.
    pub background: Color,
    /// Whether a ring is stroked around the circle.
    pub border: bool,
    /// Ring color while not selected.
    pub border_color: Color,
    /// Ring stroke width in logical pixels.
    pub border_width: f32,
    /// Ring color while selected.
    pub selected_color: Color,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: Color::TRANSPARENT,
            border: false,
            border_color: Color::WHITE,
            border_width: 2.0,
            selected_color: Color::WHITE,
        }
    }
}

/// Retained widget state, kept across view rebuilds.
#[derive(Debug, Default)]
struct State {
    raster: Option<Raster>,
    source_key: Option<u64>,
    sampler: Option<TextureSampler>,
    texture: Option<Handle>,
    min_side: f32,
    mask_radius: f32,
    is_selected: bool,
}

impl State {
    /// Rebuild the sampler and the composited texture for the current raster
    /// and drawing region. Without a raster or a usable region, both are
    /// cleared and only the background circle will be drawn.
    fn rebuild_texture(&mut self, mask_radius: f32) {
        self.mask_radius = mask_radius;

        let Some(raster) = &self.raster else {
            self.sampler = None;
            self.texture = None;
            return;
        };

        if self.min_side < 1.0 || mask_radius <= 0.0 {
            self.sampler = None;
            self.texture = None;
            return;
        }

        let sampler = TextureSampler::fit(self.min_side, raster);
        let side = self.min_side.round() as u32;
        let pixels = texture::composite_circle(raster, &sampler, side, mask_radius);

        self.sampler = Some(sampler);
        self.texture = Some(Handle::from_rgba(side, side, pixels));
    }
}

/// Hook to fire after a selection transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notify {
    Selected,
    Unselected,
}

fn is_pointer(event: &Event) -> bool {
    matches!(event, Event::Mouse(_) | Event::Touch(_))
}

/// Whether an event is the press-down phase of a pointer gesture.
fn is_press_down(event: &Event) -> bool {
    matches!(
        event,
        Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left))
            | Event::Touch(touch::Event::FingerPressed { .. })
    )
}

/// Apply one pointer event to the selection flag.
///
/// A widget that is not interactive drops any active selection and never
/// notifies. An interactive widget toggles on press-down only.
fn apply_pointer(state: &mut State, interactive: bool, press_down: bool) -> Option<Notify> {
    if !interactive {
        state.is_selected = false;
        return None;
    }

    if !press_down {
        return None;
    }

    state.is_selected = !state.is_selected;
    Some(if state.is_selected {
        Notify::Selected
    } else {
        Notify::Unselected
    })
}
