use std::error::Error as StdError;

/// Error reporter is any object that can be used to collect errors during validation by
/// [`ContextualValidation`].
///
/// Most users never touch a reporter directly and call [`ContextualValidation::validate`]
/// (all errors) or [`ContextualValidation::check`] (first error) instead.
pub trait ErrorReporter<E: StdError> {
    /// Report an error into this [`ErrorReporter`].
    fn report<E2: Into<E>>(&mut self, error: E2);
}

/// A simple [`ErrorReporter`] implementation that collects all errors into a vector,
/// in the order in which they were reported.
pub struct VecReporter<E: StdError> {
    errors: Vec<E>,
}

impl<E: StdError> VecReporter<E> {
    pub fn new() -> Self {
        VecReporter { errors: Vec::new() }
    }

    pub fn into_errors(self) -> Vec<E> {
        self.errors
    }
}

impl<E: StdError> Default for VecReporter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: StdError> ErrorReporter<E> for VecReporter<E> {
    fn report<X: Into<E>>(&mut self, error: X) {
        self.errors.push(error.into());
    }
}

/// Contextual validation trait is implemented by objects that can only be validated against a
/// certain context. A compiled aggregation rule, for example, only makes sense with respect to
/// the schema of the records it will be applied to.
///
/// The context is assumed to be immutable during validation.
///
/// Validation does not terminate when the first error is found. Instead, it collects all
/// errors into a provided [`ErrorReporter`]. Implementations should report errors in a stable
/// order, since [`ContextualValidation::check`] relies on it.
pub trait ContextualValidation<Context> {
    /// The type of error that can be thrown during validation.
    type Error: StdError;

    fn validate_all<R: ErrorReporter<Self::Error>>(&self, context: &Context, reporter: &mut R);

    fn validate(&self, context: &Context) -> Result<(), Vec<Self::Error>> {
        let mut reporter = VecReporter::new();
        self.validate_all(context, &mut reporter);
        let errors = reporter.into_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Same as [`ContextualValidation::validate`], but only the first reported error
    /// is returned.
    fn check(&self, context: &Context) -> Result<(), Self::Error> {
        match self.validate(context) {
            Ok(()) => Ok(()),
            Err(errors) => match errors.into_iter().next() {
                Some(error) => Err(error),
                None => Ok(()),
            },
        }
    }
}
