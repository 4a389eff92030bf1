// Service layer: business operations built on the detection core.

pub mod completions;
