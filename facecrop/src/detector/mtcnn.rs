use std::{fs, io};

use image::{DynamicImage, GenericImageView};
use tensorflow::{
    Graph, ImportGraphDefOptions, Session, SessionOptions, SessionRunArgs,
    Tensor,
};

use super::FaceDetector;
use crate::{config::DetectorConfig, rect::FaceRect, Error};

/// Per-stage (P-Net, R-Net, O-Net) acceptance thresholds.
pub const DEFAULT_THRESHOLDS: [f32; 3] = [0.6, 0.7, 0.7];

/// MTCNN face detector running a frozen TensorFlow graph.
///
/// The graph is expected to expose `input`, `min_size`, `thresholds`,
/// `factor` feeds and `box`, `prob` fetches, as the graphs exported by
/// https://github.com/blaueck/tf-mtcnn do.
#[derive(Debug)]
pub struct MtcnnDetector {
    graph: Graph,
    min_size: f32,
    factor: f32,
    thresholds: [f32; 3],
}

impl MtcnnDetector {
    pub fn open(config: &DetectorConfig) -> Result<Self, Error> {
        config.validate()?;
        let path = &config.model_path;
        let model = fs::read(path).map_err(|source| Error::ModelLoad {
            path: path.clone(),
            source,
        })?;
        let mut graph = Graph::new();
        graph
            .import_graph_def(&model, &ImportGraphDefOptions::new())
            .map_err(|status| Error::ModelLoad {
                path: path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidData, status.to_string()),
            })?;
        log::debug!("loaded MTCNN graph from {}", path.display());
        Ok(Self {
            graph,
            min_size: config.min_size as f32,
            factor: config.pyramid_scale(),
            thresholds: DEFAULT_THRESHOLDS,
        })
    }

    /// Set the Current `thresholds` arg
    pub fn set_thresholds(mut self, thresholds: [f32; 3]) -> Self {
        self.thresholds = thresholds;
        self
    }
}

impl FaceDetector for MtcnnDetector {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<FaceRect>, Error> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Ok(Vec::new());
        }
        let session = Session::new(&SessionOptions::new(), &self.graph)?;
        // the graph wants BGR
        let flattened: Vec<f32> = image
            .to_rgb8()
            .pixels()
            .flat_map(|p| [f32::from(p[2]), f32::from(p[1]), f32::from(p[0])])
            .collect();
        let input = Tensor::new(&[u64::from(height), u64::from(width), 3])
            .with_values(&flattened)?;
        let min_size = Tensor::new(&[]).with_values(&[self.min_size])?;
        let thresholds = Tensor::new(&[3]).with_values(&self.thresholds)?;
        let factor = Tensor::new(&[]).with_values(&[self.factor])?;

        let mut args = SessionRunArgs::new();
        args.add_feed(
            &self.graph.operation_by_name_required("min_size")?,
            0,
            &min_size,
        );
        args.add_feed(
            &self.graph.operation_by_name_required("thresholds")?,
            0,
            &thresholds,
        );
        args.add_feed(
            &self.graph.operation_by_name_required("factor")?,
            0,
            &factor,
        );
        args.add_feed(
            &self.graph.operation_by_name_required("input")?,
            0,
            &input,
        );
        let bbox = args
            .request_fetch(&self.graph.operation_by_name_required("box")?, 0);
        session.run(&mut args)?;
        let bbox_res: Tensor<f32> = args.fetch(bbox)?;

        // boxes come back as [y1, x1, y2, x2]
        Ok(bbox_res
            .chunks_exact(4)
            .map(|b| FaceRect::from([b[1], b[0], b[3], b[2]]))
            .collect())
    }
}
