use std::sync::Arc;

use async_trait::async_trait;
use sketch_ai::{AiError, Identification, Recognizer, TranslationRequest, Translator};
use sketch_core::{EncodedImage, RecognitionKind};
use sketch_store::{FileStore, HistoryStore};
use sketch_ui::editor::{DrawingSurface, PenColor};
use sketch_ui::replay::{replay, SketchAction};
use sketch_ui::{Notice, ViewShell};

struct Sun;

#[async_trait]
impl Recognizer for Sun {
    async fn identify(
        &self,
        image: &EncodedImage,
        _kind: RecognitionKind,
    ) -> Result<Identification, AiError> {
        let decoded = image::load_from_memory(image.bytes()).expect("png from the surface");
        assert_eq!((decoded.width(), decoded.height()), (80, 80));
        Ok(Identification {
            english_name: "Sun".into(),
            chinese_name: "太阳".into(),
            phonetic: "sʌn".into(),
            emoji: "☀️".into(),
            kind: None,
            simple_sentence: "The sun is hot.".into(),
        })
    }
}

#[async_trait]
impl Translator for Sun {
    async fn translate(&self, _request: &TranslationRequest) -> Result<String, AiError> {
        Ok("Soleil".into())
    }
}

fn sun_script() -> Vec<SketchAction> {
    vec![
        SketchAction::Stroke {
            color: Some(PenColor::Orange),
            points: vec![[10.0, 20.0], [30.0, 20.0], [30.0, 30.0], [10.0, 30.0], [10.0, 20.0]],
        },
        SketchAction::Stroke {
            color: None,
            points: vec![[2.0, 2.0], [8.0, 8.0]],
        },
        SketchAction::Undo,
    ]
}

#[tokio::test]
async fn test_drawn_sketch_is_identified_and_persisted() {
    let dir = tempfile::tempdir().unwrap();

    let mut surface = DrawingSurface::new(40.0, 40.0, 2.0);
    replay(&mut surface, &sun_script());
    assert!(surface.has_content());

    let history = HistoryStore::load(FileStore::new(dir.path())).unwrap();
    let mut shell = ViewShell::new(history, Arc::new(Sun), Arc::new(Sun));
    let record = shell.identify_sketch(&surface).await.unwrap();
    assert_eq!(record.kind, RecognitionKind::Sketch);

    // a fresh load sees the same collection
    let reloaded = HistoryStore::load(FileStore::new(dir.path())).unwrap();
    assert_eq!(reloaded.records(), &[record.clone()]);

    // the stored source image is the exported drawing
    let stored = EncodedImage::from_data_uri(&reloaded.records()[0].source_image).unwrap();
    assert_eq!(stored, surface.export_image().unwrap());
}

#[tokio::test]
async fn test_undone_drawing_cannot_be_identified() {
    let dir = tempfile::tempdir().unwrap();

    let mut surface = DrawingSurface::new(40.0, 40.0, 2.0);
    replay(
        &mut surface,
        &[
            SketchAction::Stroke {
                color: None,
                points: vec![[5.0, 5.0], [20.0, 20.0]],
            },
            SketchAction::Undo,
        ],
    );

    let history = HistoryStore::load(FileStore::new(dir.path())).unwrap();
    let mut shell = ViewShell::new(history, Arc::new(Sun), Arc::new(Sun));
    assert_eq!(
        shell.identify_sketch(&surface).await.unwrap_err(),
        Notice::DrawFirst
    );
    assert!(shell.history().is_empty());
}
