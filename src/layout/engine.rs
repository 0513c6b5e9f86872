//! Layout engine boundary
//!
//! [`LayoutEngine`] turns a [`LayoutRequest`] into node centers and edge
//! polylines in engine units (origin bottom left, y up). [`GraphvizEngine`]
//! implements it by piping DOT into `dot -Tplain`.

use std::collections::{HashMap, VecDeque};
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, trace, warn};

use super::config::LayoutConfig;
use super::error::LayoutError;
use super::plain::{self, PlainGraph};
use super::request::LayoutRequest;
use super::types::Point;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A routed edge in engine coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEdge {
    pub points: Vec<Point>,
}

/// Positions computed by a layout engine
///
/// Everything is in engine units with y growing upward. A request node or
/// edge missing from the maps was not placed by the engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineOutput {
    pub width: f64,
    pub height: f64,
    /// Node centers by node name
    pub nodes: HashMap<String, Point>,
    /// Edge polylines by request edge id
    pub edges: HashMap<String, RoutedEdge>,
}

impl EngineOutput {
    /// Attach a parsed plain document to the request it answers
    ///
    /// Plain output names edges only by their endpoints, so each output edge
    /// takes the id of the first unclaimed request edge with the same tail
    /// and head.
    pub fn from_plain(graph: PlainGraph, request: &LayoutRequest) -> Self {
        let mut pending: HashMap<(String, String), VecDeque<&str>> = HashMap::new();
        for edge in &request.edges {
            pending
                .entry((edge.tail.clone(), edge.head.clone()))
                .or_default()
                .push_back(edge.id.as_str());
        }

        let mut edges = HashMap::with_capacity(graph.edges.len());
        for edge in graph.edges {
            let key = (edge.tail, edge.head);
            match pending.get_mut(&key).and_then(|queue| queue.pop_front()) {
                Some(id) => {
                    edges.insert(id.to_string(), RoutedEdge { points: edge.points });
                }
                None => {
                    debug!(tail = key.0, head = key.1; "Ignoring edge not present in request");
                }
            }
        }

        let nodes = graph
            .nodes
            .into_iter()
            .map(|node| (node.name, node.center))
            .collect();

        Self {
            width: graph.width,
            height: graph.height,
            nodes,
            edges,
        }
    }
}

/// Computes positions for a layout request
pub trait LayoutEngine {
    fn layout(&self, request: &LayoutRequest) -> Result<EngineOutput, LayoutError>;
}

/// Layout engine backed by the Graphviz `dot` executable
#[derive(Debug, Clone)]
pub struct GraphvizEngine {
    command: String,
    timeout: Duration,
}

impl Default for GraphvizEngine {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl GraphvizEngine {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(
            config.engine_command.clone(),
            Duration::from_millis(config.engine_timeout_ms),
        )
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the engine on DOT input and return its plain output
    fn run(&self, dot: &str) -> Result<String, LayoutError> {
        debug!(command = self.command, timeout_ms = self.timeout.as_millis() as u64; "Running layout engine");

        let mut child = Command::new(&self.command)
            .arg("-Tplain")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| LayoutError::EngineUnavailable {
                command: self.command.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let input = dot.to_string();
        let writer = thread::spawn(move || -> io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input.as_bytes())?;
            }
            Ok(())
        });
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                warn!(command = self.command; "Layout engine timed out, killing it");
                if let Err(err) = child.kill() {
                    debug!(err:err; "Failed to kill layout engine");
                }
                let _ = child.wait();
                return Err(LayoutError::EngineTimeout {
                    command: self.command.clone(),
                    timeout: self.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        let written = join(writer);
        let stdout = join(stdout)?;
        let stderr = join(stderr)?;

        if !status.success() {
            return Err(LayoutError::engine_failed(
                self.command.clone(),
                status.to_string(),
                String::from_utf8_lossy(&stderr).trim(),
            ));
        }
        written?;

        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

impl LayoutEngine for GraphvizEngine {
    fn layout(&self, request: &LayoutRequest) -> Result<EngineOutput, LayoutError> {
        let dot = request.to_dot();
        trace!(dot; "Layout request");

        let output = self.run(&dot)?;
        trace!(output; "Layout engine output");

        let graph = plain::parse(&output)?;
        Ok(EngineOutput::from_plain(graph, request))
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn join<T>(handle: JoinHandle<io::Result<T>>) -> io::Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("layout engine pipe thread panicked")))
}
