use std::thread;

/// Control-thread handle to the data-parallel compute domain.
///
/// A dispatch splits the rows of a layered grid across worker threads and
/// joins before returning. That join is the global barrier between
/// dependent stages: no work-item of a later stage may start until every
/// row of the current dispatch has committed. Rows within one dispatch are
/// independent and may run in any order.
pub struct ComputeDevice {
  workers: usize,
}

fn plane_rows(lens: &[usize], row_len: usize) -> usize {
  debug_assert!(row_len > 0, "row length must be non-zero");
  debug_assert!(
    lens.iter().all(|len| *len == lens[0]),
    "all planes of one dispatch must have the same length"
  );
  debug_assert!(lens[0] % row_len == 0, "plane length must be a whole number of rows");
  lens[0] / row_len
}

/// Generates a dispatch entry point writing one or more output planes.
///
/// Every plane is split into the same per-worker runs of whole rows, so a
/// work-item `f(row, ..)` owns row `row` of each plane exclusively while it
/// may freely read any shared input captured by the closure.
macro_rules! plane_dispatch {
  ($(#[$doc:meta])* $name:ident: $($plane:ident: $t:ident),+) => {
    $(#[$doc])*
    pub fn $name<$($t,)+ F>(&self, $($plane: &mut [$t],)+ row_len: usize, f: F)
    where
      $($t: Send,)+
      F: Fn(usize, $(&mut [$t]),+) + Sync,
    {
      let rows = plane_rows(&[$($plane.len()),+], row_len);
      if rows == 0 {
        return;
      }

      let chunk_rows = (rows + self.workers - 1) / self.workers;
      let mut runs = Vec::new();
      {
        $(let mut $plane = &mut *$plane;)+
        let mut base = 0;
        while base < rows {
          let take_rows = chunk_rows.min(rows - base);
          runs.push((
            base,
            take_rows,
            $({
              let (head, tail) =
                std::mem::take(&mut $plane).split_at_mut(take_rows * row_len);
              $plane = tail;
              head
            },)+
          ));
          base += take_rows;
        }
      }

      thread::scope(|scope| {
        for (base, take_rows, $($plane),+) in runs {
          let f = &f;
          scope.spawn(move || {
            for row in 0..take_rows {
              let span = row * row_len..(row + 1) * row_len;
              f(base + row, $(&mut $plane[span.clone()]),+);
            }
          });
        }
      });
    }
  };
}

impl ComputeDevice {
  pub fn new(workers: usize) -> Self {
    Self {
      workers: workers.max(1),
    }
  }

  /// One worker per hardware thread reported by the host.
  pub fn with_available_parallelism() -> Self {
    let workers = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    Self::new(workers)
  }

  pub fn workers(&self) -> usize {
    self.workers
  }

  plane_dispatch!(
    /// Dispatch over one output plane.
    dispatch: out: A
  );

  plane_dispatch!(
    /// Dispatch writing two output planes from the same work-item grid.
    dispatch2: out_a: A, out_b: B
  );

  plane_dispatch!(
    /// Dispatch writing three output planes from the same work-item grid.
    dispatch3: out_a: A, out_b: B, out_c: C
  );

  plane_dispatch!(
    /// Dispatch writing four output planes from the same work-item grid.
    dispatch4: out_a: A, out_b: B, out_c: C, out_d: D
  );
}
