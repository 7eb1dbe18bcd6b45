//! The fixed catalog of meme templates.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

/// A text-placement rectangle inside a template image, in pixels.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct TextArea {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width of the area
    pub width: u32,
    /// Height of the area
    pub height: u32,
}

impl TextArea {
    const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the whole rectangle lies within an image of the given size.
    pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        self.x.saturating_add(self.width) <= image_width
            && self.y.saturating_add(self.height) <= image_height
    }
}

/// A meme image plus where its two captions go.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Unique slug
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Where the presentation layer loads the image from
    pub image_ref: &'static str,
    /// Semantic category, eg "choice" or "disaster"
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Placement of the top caption
    pub top_text_area: TextArea,
    /// Placement of the bottom caption
    pub bottom_text_area: TextArea,
}

impl Template {
    /// File name of the template image, eg `drake.png`.
    pub fn image_file(&self) -> &'static str {
        self.image_ref
            .rsplit('/')
            .next()
            .unwrap_or(self.image_ref)
    }
}

/// Drake rejecting one thing and approving another.
pub const DRAKE: Template = Template {
    id: "drake",
    name: "Drake Pointing",
    image_ref: "/memes/drake.png",
    kind: "choice",
    top_text_area: TextArea::new(200, 50, 300, 150),
    bottom_text_area: TextArea::new(200, 250, 300, 150),
};

/// Being pulled away by something new.
pub const DISTRACTED_BOYFRIEND: Template = Template {
    id: "distracted-boyfriend",
    name: "Distracted Boyfriend",
    image_ref: "/memes/distracted-boyfriend.jpg",
    kind: "temptation",
    top_text_area: TextArea::new(50, 20, 500, 60),
    bottom_text_area: TextArea::new(50, 320, 500, 60),
};

/// Disagreements and confusion.
pub const WOMAN_YELLING_CAT: Template = Template {
    id: "woman-yelling-cat",
    name: "Woman Yelling at Cat",
    image_ref: "/memes/woman-yelling-cat.jpg",
    kind: "argument",
    top_text_area: TextArea::new(50, 20, 500, 60),
    bottom_text_area: TextArea::new(50, 320, 500, 60),
};

/// Everything burning while staying calm.
pub const THIS_IS_FINE: Template = Template {
    id: "this-is-fine",
    name: "This is Fine",
    image_ref: "/memes/this-is-fine.jpg",
    kind: "disaster",
    top_text_area: TextArea::new(50, 20, 400, 60),
    bottom_text_area: TextArea::new(50, 280, 400, 60),
};

/// A progression of ideas.
pub const EXPANDING_BRAIN: Template = Template {
    id: "expanding-brain",
    name: "Expanding Brain",
    image_ref: "/memes/expanding-brain.jpg",
    kind: "evolution",
    top_text_area: TextArea::new(200, 50, 300, 80),
    bottom_text_area: TextArea::new(200, 450, 300, 80),
};

/// Hard decisions.
pub const TWO_BUTTONS: Template = Template {
    id: "two-buttons",
    name: "Two Buttons",
    image_ref: "/memes/two-buttons.jpg",
    kind: "difficult-choice",
    top_text_area: TextArea::new(50, 20, 400, 60),
    bottom_text_area: TextArea::new(50, 320, 400, 60),
};

/// Controversial statements.
pub const CHANGE_MY_MIND: Template = Template {
    id: "change-my-mind",
    name: "Change My Mind",
    image_ref: "/memes/change-my-mind.jpg",
    kind: "opinion",
    top_text_area: TextArea::new(50, 20, 500, 60),
    bottom_text_area: TextArea::new(50, 320, 500, 60),
};

/// Entirely predictable consequences.
pub const SURPRISED_PIKACHU: Template = Template {
    id: "surprised-pikachu",
    name: "Surprised Pikachu",
    image_ref: "/memes/surprised-pikachu.png",
    kind: "surprise",
    top_text_area: TextArea::new(50, 20, 400, 60),
    bottom_text_area: TextArea::new(50, 280, 400, 60),
};

/// Every template, in catalog order.
pub static TEMPLATES: [Template; 8] = [
    DRAKE,
    DISTRACTED_BOYFRIEND,
    WOMAN_YELLING_CAT,
    THIS_IS_FINE,
    EXPANDING_BRAIN,
    TWO_BUTTONS,
    CHANGE_MY_MIND,
    SURPRISED_PIKACHU,
];

/// Returned by [`by_id`] for an unknown slug.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TemplateNotFound(pub String);

impl std::fmt::Display for TemplateNotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No meme template with id {}", self.0)
    }
}

impl std::error::Error for TemplateNotFound {}

/// All templates in catalog order.
pub fn all() -> &'static [Template] {
    &TEMPLATES
}

/// Looks a template up by its slug.
pub fn by_id(id: &str) -> Result<&'static Template, TemplateNotFound> {
    TEMPLATES
        .iter()
        .find(|template| template.id == id)
        .ok_or_else(|| TemplateNotFound(id.to_string()))
}

/// Looks a template up by its image file name, eg `drake.png`.
pub fn by_image_file(file: &str) -> Option<&'static Template> {
    TEMPLATES
        .iter()
        .find(|template| template.image_file() == file)
}

/// Warns about template images that are missing, unreadable, or too small
/// for their text areas. Returns the number of templates with a problem.
pub fn check_template_images(image_dir: &Path) -> usize {
    let mut problems = 0;
    for template in all() {
        let path = image_dir.join(template.image_file());
        match image::image_dimensions(&path) {
            Ok((width, height)) => {
                let fits = template.top_text_area.fits_within(width, height)
                    && template.bottom_text_area.fits_within(width, height);
                if fits {
                    debug!("Template {} image is {}x{}", template.id, width, height);
                } else {
                    warn!(
                        "Template {} text areas fall outside its {}x{} image",
                        template.id, width, height
                    );
                    problems += 1;
                }
            }
            Err(err) => {
                warn!(
                    "Template {} image {} unavailable: {}",
                    template.id,
                    path.display(),
                    err
                );
                problems += 1;
            }
        }
    }
    problems
}
