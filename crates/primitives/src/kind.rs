use std::sync::Arc;

/// Structural classification of a surface, resolved by the host adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceKind {
	/// A text-editing surface that can host an interception engine.
	Plain,
	/// A tabbed multi-page container.
	Paged,
	/// A container showing several inner editors side by side.
	Aggregate,
	/// Any other part. Editable surfaces inside it can only be found by a
	/// registered extractor.
	External {
		/// Concrete type name followed by its supertypes, most specific first.
		type_chain: Vec<Arc<str>>,
	},
}

impl SurfaceKind {
	/// Builds an external kind from a type chain.
	pub fn external<I, S>(type_chain: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Arc<str>>,
	{
		Self::External {
			type_chain: type_chain.into_iter().map(Into::into).collect(),
		}
	}

	/// Returns true for the container kinds the manager traverses natively.
	pub const fn is_container(&self) -> bool {
		matches!(self, Self::Paged | Self::Aggregate)
	}

	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Plain => "plain",
			Self::Paged => "paged",
			Self::Aggregate => "aggregate",
			Self::External { .. } => "external",
		}
	}
}
