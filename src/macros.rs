/// Define a struct whose fields are bound to environment variables.
///
/// A field is bound by appending `= env("KEY")` after its type, optionally
/// with a fallback literal written the way the field's parser reads it:
/// `= env("KEY", fallback = "30s")`. The generated [`EnvStruct`] impl lists
/// the fields in declaration order. Only `pub` fields are settable; untagged
/// and non-`pub` fields are left alone by the loader.
///
/// ```
/// use std::time::Duration;
///
/// tyenv::env_struct! {
///     #[derive(Debug, Default)]
///     pub struct Server {
///         pub host: String = env("SERVER_HOST", fallback = "127.0.0.1"),
///         pub port: u16 = env("SERVER_PORT", fallback = "8080"),
///         pub idle: Duration = env("SERVER_IDLE", fallback = "90s"),
///         pub label: String,
///     }
/// }
///
/// let loader = tyenv::Loader::new()
///     .source(tyenv::EnvSource::memory().with_var("SERVER_PORT", "9000"));
/// let mut server = Server::default();
/// loader.load(&mut server).unwrap();
///
/// assert_eq!(server.host, "127.0.0.1");
/// assert_eq!(server.port, 9000);
/// assert_eq!(server.idle, Duration::from_secs(90));
/// ```
///
/// [`EnvStruct`]: crate::EnvStruct
#[macro_export]
macro_rules! env_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
                $(= env($key:literal $(, fallback = $fallback:literal)?))?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::EnvStruct for $name {
            fn fields(&mut self) -> ::std::vec::Vec<$crate::Field<'_>> {
                ::std::vec![
                    $(
                        $crate::Field::new(::core::stringify!($field), &mut self.$field)
                            .settable($crate::__private::is_public(::core::stringify!($field_vis)))
                            $(
                                .key($key)
                                $( .fallback($fallback) )?
                            )?
                    ),*
                ]
            }
        }
    };
}
