use crate::frame::Frame;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct SegmentDump {
    pub width: f64,
    pub height: f64,
    pub connectors: Vec<ConnectorDump>,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub index: usize,
    pub anchors: Vec<String>,
    pub segments: Vec<[[f64; 2]; 2]>,
    pub omitted: Vec<String>,
}

impl SegmentDump {
    pub fn from_frame(frame: &Frame) -> Self {
        let connectors = frame
            .connectors
            .iter()
            .enumerate()
            .map(|(index, connector)| ConnectorDump {
                index,
                anchors: connector.anchors.clone(),
                segments: connector
                    .segments
                    .iter()
                    .map(|segment| [segment.start.to_array(), segment.end.to_array()])
                    .collect(),
                omitted: connector.omitted.clone(),
            })
            .collect();

        SegmentDump {
            width: frame.width,
            height: frame.height,
            connectors,
        }
    }
}

pub fn write_segment_dump(frame: &Frame, output: Option<&Path>) -> anyhow::Result<()> {
    let dump = SegmentDump::from_frame(frame);
    match output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &dump)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
