//! Batch accumulation with count and byte bounds.

use sower_weaviate::types::WeaviateObject;

/// A bounded group of objects, immutable once emitted.
#[derive(Debug, Clone)]
pub struct Batch {
    objects: Vec<WeaviateObject>,
    estimated_bytes: usize,
}

impl Batch {
    pub fn objects(&self) -> &[WeaviateObject] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<WeaviateObject> {
        self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn estimated_bytes(&self) -> usize {
        self.estimated_bytes
    }
}

/// Collects objects into batches bounded by object count and estimated
/// serialized size.
///
/// The size estimate is maintained incrementally: each object is measured
/// once when pushed, keeping per-row cost constant. An object whose own
/// estimate exceeds the byte bound still goes out, as a one-object batch;
/// the bounds cap accumulation, not single-object size.
#[derive(Debug)]
pub struct BatchAccumulator {
    max_objects: usize,
    max_bytes: usize,
    objects: Vec<WeaviateObject>,
    estimated_bytes: usize,
}

impl BatchAccumulator {
    pub fn new(max_objects: usize, max_bytes: usize) -> Self {
        Self {
            max_objects,
            max_bytes,
            objects: Vec::new(),
            estimated_bytes: 0,
        }
    }

    /// Adds an object, returning a completed batch once a bound is reached.
    pub fn push(&mut self, object: WeaviateObject) -> Option<Batch> {
        self.estimated_bytes += estimate_size(&object);
        self.objects.push(object);

        if self.objects.len() >= self.max_objects || self.estimated_bytes >= self.max_bytes {
            return self.take();
        }
        None
    }

    /// Emits whatever partial batch remains. Called at partition end.
    pub fn flush(&mut self) -> Option<Batch> {
        self.take()
    }

    pub fn pending(&self) -> usize {
        self.objects.len()
    }

    fn take(&mut self) -> Option<Batch> {
        if self.objects.is_empty() {
            return None;
        }
        let batch = Batch {
            objects: std::mem::take(&mut self.objects),
            estimated_bytes: self.estimated_bytes,
        };
        self.estimated_bytes = 0;
        Some(batch)
    }
}

/// The object's serialized JSON size, plus one byte of array overhead.
fn estimate_size(object: &WeaviateObject) -> usize {
    serde_json::to_vec(object).map(|body| body.len()).unwrap_or(0) + 1
}
