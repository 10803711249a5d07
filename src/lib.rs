pub mod shared {
    pub mod core {
        pub mod application_error;
        pub mod duration;
        pub mod time_reference;
    }
    pub mod infrastructure {
        pub mod http;
        pub mod repository;
    }
}

pub mod contracts {
    pub mod project;
    pub mod time_entry;
    pub mod user;
}

pub mod modules {
    pub mod identity {
        pub mod core {
            pub mod user;
        }
        pub mod use_cases {
            pub mod authenticate_request {
                pub mod handler;
                pub mod issuer;
                pub mod verifier;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod get_current_user {
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod oidc_verifier;
            }
        }
    }

    pub mod projects {
        pub mod core {
            pub mod project;
        }
        pub mod use_cases {
            pub mod add_project {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod get_project {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod list_projects {
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod update_project {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
    }

    pub mod time_entries {
        pub mod core {
            pub mod format;
            pub mod time_entry;
        }
        pub mod use_cases {
            pub mod add_time_entry {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod get_time_entry {
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod list_time_entries {
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod start_time_entry {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod stop_time_entry {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod update_time_entry {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
    }
}

pub mod shell;

pub mod cli {
    pub mod api_client;
    pub mod args;
    pub mod commands;
    pub mod config;
    pub mod login;
}
