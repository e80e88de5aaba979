//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up a variant by its database status ID.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// The `name` column of the lookup row.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

define_status_enum! {
    /// Lost report lifecycle status.
    LostItemStatus {
        Active = 1 => "active",
        Matched = 2 => "matched",
        Closed = 3 => "closed",
    }
}

define_status_enum! {
    /// Found report lifecycle status.
    FoundItemStatus {
        Available = 1 => "available",
        Matched = 2 => "matched",
        Returned = 3 => "returned",
    }
}

define_status_enum! {
    /// Lost/found pairing review status.
    MatchStatus {
        Pending = 1 => "pending",
        Confirmed = 2 => "confirmed",
        Rejected = 3 => "rejected",
    }
}

define_status_enum! {
    /// Ownership claim verification status.
    ClaimStatus {
        Pending = 1 => "pending",
        Passed = 2 => "passed",
        Failed = 3 => "failed",
    }
}
