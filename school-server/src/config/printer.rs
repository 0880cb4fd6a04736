use serde::Deserialize;

/// Partition of the student list used by the printing demonstrations.
///
/// The first `lead_items` students are printed by the calling task, the next
/// `workers * items_per_worker` students are split into consecutive chunks of
/// `items_per_worker`, one chunk per worker thread.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PrinterConfig {
    /// Items printed on the calling task before any worker starts (default: 2)
    #[serde(default = "default_lead_items")]
    pub lead_items: usize,

    /// Number of worker threads (default: 2)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Items printed by each worker (default: 2)
    #[serde(default = "default_items_per_worker")]
    pub items_per_worker: usize,
}

fn default_lead_items() -> usize {
    2
}

fn default_workers() -> usize {
    2
}

fn default_items_per_worker() -> usize {
    2
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            lead_items: default_lead_items(),
            workers: default_workers(),
            items_per_worker: default_items_per_worker(),
        }
    }
}

impl PrinterConfig {
    /// Number of items a print run needs before it does anything, or `None`
    /// when the partition does not fit in `usize`
    pub fn checked_required_items(&self) -> Option<usize> {
        self.workers
            .checked_mul(self.items_per_worker)?
            .checked_add(self.lead_items)
    }

    /// Number of items a print run needs before it does anything. An
    /// overflowing partition saturates, so no item list ever satisfies it.
    pub fn required_items(&self) -> usize {
        self.checked_required_items().unwrap_or(usize::MAX)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.workers > 0 && self.items_per_worker == 0 {
            return Err("printer.items_per_worker must be positive when workers are configured".to_string());
        }
        let required = self
            .checked_required_items()
            .ok_or_else(|| "printer partition overflows".to_string())?;
        if required == 0 {
            return Err("printer configuration must print at least one item".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_items() {
        let config = PrinterConfig {
            lead_items: 1,
            workers: 3,
            items_per_worker: 4,
        };
        assert_eq!(config.required_items(), 13);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_partitions() {
        let no_items = PrinterConfig {
            lead_items: 0,
            workers: 0,
            items_per_worker: 3,
        };
        assert!(no_items.validate().is_err());

        let empty_workers = PrinterConfig {
            lead_items: 2,
            workers: 2,
            items_per_worker: 0,
        };
        assert!(empty_workers.validate().is_err());

        let overflowing = PrinterConfig {
            lead_items: 2,
            workers: usize::MAX / 2 + 1,
            items_per_worker: 2,
        };
        assert_eq!(
            overflowing.validate(),
            Err("printer partition overflows".to_string())
        );
        assert_eq!(overflowing.checked_required_items(), None);
        assert_eq!(overflowing.required_items(), usize::MAX);

        let overflowing_lead = PrinterConfig {
            lead_items: usize::MAX,
            workers: 1,
            items_per_worker: 1,
        };
        assert!(overflowing_lead.validate().is_err());
    }
}
