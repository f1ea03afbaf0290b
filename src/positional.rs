/// How many consecutive positional slots a name occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Count(usize),
    Unlimited,
}

impl Arity {
    pub fn is_unlimited(self) -> bool {
        self == Arity::Unlimited
    }
}

/// Ordered positional slots of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionalLayout {
    entries: Vec<(String, Arity)>,
}

impl PositionalLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `arity` slots bound to `name`.
    ///
    /// Panics when an unlimited entry is not last, when the arity is zero or
    /// when `name` is not contiguous.
    pub fn add(mut self, name: impl Into<String>, arity: Arity) -> Self {
        let name = name.into();
        assert!(!self.is_unlimited(), "`{name}` added after an unlimited positional");
        assert!(arity != Arity::Count(0), "`{name}` added with zero arity");
        let continues_last = matches!(self.entries.last(), Some((last, _)) if *last == name);
        if continues_last {
            if let (Some((_, Arity::Count(n))), Arity::Count(more)) =
                (self.entries.last_mut(), arity)
            {
                *n += more;
                return self;
            }
        } else {
            assert!(
                self.entries.iter().all(|(it, _)| *it != name),
                "`{name}` appears in two separate runs of positionals"
            );
        }
        self.entries.push((name, arity));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self.entries.last(), Some((_, Arity::Unlimited)))
    }

    /// Total number of slots, `None` when the last entry is unlimited.
    pub fn max_total_count(&self) -> Option<usize> {
        let mut res = 0;
        for (_, arity) in &self.entries {
            match arity {
                Arity::Count(n) => res += n,
                Arity::Unlimited => return None,
            }
        }
        Some(res)
    }

    pub fn name_for_position(&self, position: usize) -> Option<&str> {
        let mut start = 0;
        for (name, arity) in &self.entries {
            match *arity {
                Arity::Count(n) if position < start + n => return Some(name),
                Arity::Count(n) => start += n,
                Arity::Unlimited => return Some(name),
            }
        }
        None
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of slots worth scanning: the finite slots, or for an unlimited
    /// layout everything up to the first slot of the trailing name.
    fn distinct_slots(&self) -> usize {
        let last = match self.entries.last() {
            Some((name, Arity::Unlimited)) => name,
            _ => return self.max_total_count().unwrap_or(0),
        };
        let mut count = 0;
        while self.name_for_position(count) != Some(last.as_str()) {
            count += 1;
        }
        count + 1
    }
}

/// Where a positional option sits and how many values it takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionalInfo {
    pub position: usize,
    pub instances: Arity,
}

impl PositionalInfo {
    pub fn unlimited_instances(&self) -> bool {
        self.instances.is_unlimited()
    }
}

/// Finds the slot(s) bound to `name`, `None` if it is not positional.
pub fn locate(layout: &PositionalLayout, name: &str) -> Option<PositionalInfo> {
    let unlimited = layout.is_unlimited();
    let count = layout.distinct_slots();

    let mut instances = 0;
    for position in 0..count {
        let last = position + 1 == count;
        if layout.name_for_position(position) == Some(name) {
            instances += 1;
            if last {
                let instances = if unlimited { Arity::Unlimited } else { Arity::Count(instances) };
                return Some(PositionalInfo { position, instances });
            }
        } else if instances > 0 {
            return Some(PositionalInfo { position: position - 1, instances: Arity::Count(instances) });
        }
    }
    None
}
