use crate::{
    colors::Palette,
    segments::{Context, RenderedSegment, StatusSegment},
};

const MODEL_SYMBOL: char = '◆';
const VENDOR_PREFIX: &str = "Claude ";

pub struct ModelSegment {
    name: String,
}

impl ModelSegment {
    pub fn new(context: &Context) -> Option<Self> {
        Some(ModelSegment {
            name: context.model_name.replacen(VENDOR_PREFIX, "", 1),
        })
    }
}

impl StatusSegment for ModelSegment {
    fn render(&self, palette: &Palette) -> RenderedSegment {
        RenderedSegment::new(palette.icon_label(palette.purple, MODEL_SYMBOL, &self.name))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ansi::strip_ansi,
        colors::Palette,
        segments::{Context, StatusSegment},
    };

    use super::ModelSegment;

    fn context(model_name: &str) -> Context {
        Context {
            model_name: model_name.to_string(),
            ..Context::for_test("/")
        }
    }

    #[test]
    fn strips_vendor_prefix() {
        let segment = ModelSegment::new(&context("Claude Sonnet 4.5")).unwrap();
        let rendered = segment.render(&Palette::DEFAULT);
        assert_eq!(strip_ansi(&rendered.text), "◆ Sonnet 4.5");
        assert_eq!(rendered.width, 12);
    }

    #[test]
    fn keeps_other_names() {
        let segment = ModelSegment::new(&context("Claude")).unwrap();
        assert_eq!(strip_ansi(&segment.render(&Palette::DEFAULT).text), "◆ Claude");
    }
}
