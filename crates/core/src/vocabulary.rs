//! Static word lists and pattern tables shared by the classifier and the
//! categorizer.

pub const TECHNICAL_TERMS: &[&str] = &[
    "dev", "repo", "api", "sdk", "framework", "plugin", "module", "component", "database",
    "server", "client", "config", "settings", "admin", "system", "template", "sample",
    "example", "test", "demo", "prototype", "poc", "backup", "archive", "temp", "tmp", "cache",
    "log", "debug", "error", "page", "pages", "document", "file", "folder", "directory", "path",
    "internal", "external", "public", "private", "shared", "common", "old", "new", "legacy",
    "current", "latest", "final", "draft", "part", "section", "chapter", "appendix", "index",
    "table", "plc", "scada", "hmi", "dcs", "mes", "erp", "crm", "bi", "etl",
];

/// Searched anywhere in the candidate.
pub const TECHNICAL_PATTERNS: &[&str] = &[
    r"^\d+\.\d+\.\d+",
    r"\b(dev|repo|api|sdk|lib|framework|plugin|module|component)\b",
    r"\b(database|server|client|config|settings|admin|system)\b",
    r"\b(template|sample|example|test|demo|prototype)\b",
    r"\b(backup|archive|temp|tmp|cache|log|debug)\b",
    r"\b(v\d+|ver\d+|version\d+|release\d+|build\d+)\b",
    r"\b(page|pages|document|file|folder|directory)\b",
    r"\b(internal|external|public|private|shared|common)\b",
    r"\b(old|new|legacy|current|latest|final|draft)\b",
    r"\b(part|section|chapter|appendix|index|table)\b",
];

pub const VERSION_PATTERNS: &[&str] = &[
    r"^v?\d+\.\d+(\.\d+)?",
    r"\bv\d+",
    r"\bver(sion)?\s*\d+",
    r"\brel(ease)?\s*\d+",
    r"\bbuild\s*\d+",
];

pub const DOCUMENT_PATTERNS: &[&str] = &[
    r"^\d+\.\d+",
    r"\bchapter\s*\d+",
    r"\bsection\s*\d+",
    r"\bpart\s*\d+",
    r"\bappendix\s*[a-z]\b",
    r"\bpage\s*\d+",
    r"\btable\s*\d+",
    r"\bfigure\s*\d+",
];

pub const ABBREVIATIONS: &[(&str, &str)] = &[
    // business / legal
    ("PROP & VAR", "Proposal and Variation"),
    ("PROP VAR", "Proposal and Variation"),
    ("PROP", "Proposal"),
    ("VAR", "Variation"),
    ("P&V", "Proposal and Variation"),
    ("T&C", "Terms and Conditions"),
    ("T&CS", "Terms and Conditions"),
    ("R&D", "Research and Development"),
    ("P&L", "Profit and Loss"),
    ("B&P", "Business and Procurement"),
    ("HR", "Human Resources"),
    ("IT", "Information Technology"),
    ("QA", "Quality Assurance"),
    ("QC", "Quality Control"),
    ("PR", "Public Relations"),
    ("CEO", "Chief Executive Officer"),
    ("CTO", "Chief Technology Officer"),
    ("CFO", "Chief Financial Officer"),
    ("COO", "Chief Operating Officer"),
    ("VP", "Vice President"),
    ("GM", "General Manager"),
    ("PM", "Project Manager"),
    ("BA", "Business Analyst"),
    ("SA", "System Administrator"),
    ("DBA", "Database Administrator"),
    // construction / engineering
    ("BIM", "Building Information Modeling"),
    ("CAD", "Computer-Aided Design"),
    ("MEP", "Mechanical, Electrical, and Plumbing"),
    ("HVAC", "Heating, Ventilation, and Air Conditioning"),
    ("QS", "Quantity Surveying"),
    ("BOQ", "Bill of Quantities"),
    ("RFI", "Request for Information"),
    ("RFP", "Request for Proposal"),
    ("RFQ", "Request for Quote"),
    ("SOW", "Statement of Work"),
    ("WBS", "Work Breakdown Structure"),
    ("PO", "Purchase Order"),
    ("SO", "Sales Order"),
    ("DO", "Delivery Order"),
    ("DN", "Delivery Note"),
    ("GRN", "Goods Received Note"),
    ("MTO", "Material Take-Off"),
    ("IFC", "Industry Foundation Classes"),
    ("DWG", "Drawing"),
    ("PDF", "Portable Document Format"),
    ("JPG", "JPEG Image"),
    ("PNG", "Portable Network Graphics"),
    ("DOC", "Document"),
    ("XLS", "Excel Spreadsheet"),
    ("PPT", "PowerPoint Presentation"),
    // IT
    ("API", "Application Programming Interface"),
    ("SDK", "Software Development Kit"),
    ("IDE", "Integrated Development Environment"),
    ("CRM", "Customer Relationship Management"),
    ("ERP", "Enterprise Resource Planning"),
    ("SCM", "Supply Chain Management"),
    ("PLM", "Product Lifecycle Management"),
    ("CMS", "Content Management System"),
    ("LMS", "Learning Management System"),
    ("DBMS", "Database Management System"),
    ("OS", "Operating System"),
    ("UI", "User Interface"),
    ("UX", "User Experience"),
    ("SQL", "Structured Query Language"),
    ("XML", "Extensible Markup Language"),
    ("JSON", "JavaScript Object Notation"),
    ("CSV", "Comma-Separated Values"),
    ("FTP", "File Transfer Protocol"),
    ("HTTP", "Hypertext Transfer Protocol"),
    ("HTTPS", "Hypertext Transfer Protocol Secure"),
    ("URL", "Uniform Resource Locator"),
    ("IP", "Internet Protocol"),
    ("TCP", "Transmission Control Protocol"),
    ("UDP", "User Datagram Protocol"),
    ("DNS", "Domain Name System"),
    ("VPN", "Virtual Private Network"),
    ("LAN", "Local Area Network"),
    ("WAN", "Wide Area Network"),
    ("WIFI", "Wireless Fidelity"),
    ("USB", "Universal Serial Bus"),
    ("SSD", "Solid State Drive"),
    ("HDD", "Hard Disk Drive"),
    ("CPU", "Central Processing Unit"),
    ("GPU", "Graphics Processing Unit"),
    ("RAM", "Random Access Memory"),
    ("ROM", "Read-Only Memory"),
    // finance / accounting
    ("GST", "Goods and Services Tax"),
    ("VAT", "Value Added Tax"),
    ("POS", "Point of Sale"),
    ("ROI", "Return on Investment"),
    ("NPV", "Net Present Value"),
    ("IRR", "Internal Rate of Return"),
    ("EBITDA", "Earnings Before Interest, Taxes, Depreciation, and Amortization"),
    ("CAPEX", "Capital Expenditure"),
    ("OPEX", "Operating Expenditure"),
    ("AP", "Accounts Payable"),
    ("AR", "Accounts Receivable"),
    ("GL", "General Ledger"),
    ("COA", "Chart of Accounts"),
    ("JE", "Journal Entry"),
    ("TB", "Trial Balance"),
    ("BS", "Balance Sheet"),
    ("IS", "Income Statement"),
    ("CF", "Cash Flow"),
    // time
    ("YTD", "Year to Date"),
    ("QTD", "Quarter to Date"),
    ("MTD", "Month to Date"),
    ("EOD", "End of Day"),
    ("EOW", "End of Week"),
    ("EOM", "End of Month"),
    ("EOY", "End of Year"),
    ("FY", "Financial Year"),
    ("Q1", "Quarter 1"),
    ("Q2", "Quarter 2"),
    ("Q3", "Quarter 3"),
    ("Q4", "Quarter 4"),
    // general business
    ("KPI", "Key Performance Indicator"),
    ("SLA", "Service Level Agreement"),
    ("NDA", "Non-Disclosure Agreement"),
    ("MOU", "Memorandum of Understanding"),
    ("LOI", "Letter of Intent"),
    ("FAQ", "Frequently Asked Questions"),
    ("SOP", "Standard Operating Procedure"),
    ("WIP", "Work in Progress"),
    ("ETA", "Estimated Time of Arrival"),
    ("ETD", "Estimated Time of Departure"),
    ("FYI", "For Your Information"),
    ("ASAP", "As Soon As Possible"),
    ("TBD", "To Be Determined"),
    ("TBA", "To Be Announced"),
    ("TBC", "To Be Confirmed"),
    ("N/A", "Not Applicable"),
    // places
    ("HQ", "Headquarters"),
    ("HO", "Head Office"),
    ("BO", "Branch Office"),
    ("RO", "Regional Office"),
    ("USA", "United States of America"),
    ("UK", "United Kingdom"),
    ("UAE", "United Arab Emirates"),
    ("KSA", "Kingdom of Saudi Arabia"),
    ("EU", "European Union"),
    ("APAC", "Asia-Pacific"),
    ("EMEA", "Europe, Middle East, and Africa"),
    ("LATAM", "Latin America"),
    ("ANZ", "Australia and New Zealand"),
    ("SEA", "South East Asia"),
    ("MENA", "Middle East and North Africa"),
];

/// Lowercase words that on their own identify a well-known business.
pub const KNOWN_COMPANY_TOKENS: &[&str] = &[
    // technology
    "microsoft", "apple", "google", "amazon", "meta", "facebook", "tesla", "netflix", "oracle",
    "salesforce", "adobe", "cisco", "intel", "nvidia", "ibm", "dell", "hp", "lenovo", "samsung",
    "sony", "lg", "huawei", "xiaomi", "spotify",
    // finance
    "jpmorgan", "morgan", "chase", "wells", "fargo", "citigroup", "goldman", "sachs",
    "american", "express", "visa", "mastercard", "paypal", "square", "stripe",
    // retail
    "walmart", "target", "costco", "home", "depot", "lowes", "macys", "nike", "adidas", "puma",
    "under", "armour", "coca", "cola", "pepsi", "starbucks",
    // pharma
    "pfizer", "johnson", "merck", "abbott", "bristol", "myers", "squibb", "novartis", "roche",
    "sanofi", "gsk", "glaxosmithkline",
    // automotive
    "toyota", "honda", "nissan", "ford", "chevrolet", "bmw", "mercedes", "audi", "volkswagen",
    "hyundai", "kia", "volvo", "subaru", "mazda",
    // engineering
    "caterpillar", "deere", "boeing", "lockheed", "martin", "general", "electric", "siemens",
    "schneider", "honeywell", "emerson", "3m",
    // energy
    "exxon", "mobil", "chevron", "shell", "bp", "total", "conocophillips", "duke", "energy",
    "southern", "company", "dominion", "nextera",
    // telecommunications
    "verizon", "att", "tmobile", "sprint", "comcast", "charter", "dish", "vodafone", "orange",
    "telefonica", "deutsche", "telekom",
    // media
    "disney", "warner", "bros", "universal", "paramount", "pictures", "fox", "cbs", "nbc",
    "abc", "espn", "cnn", "bbc", "reuters",
    // travel
    "airlines", "delta", "united", "southwest", "jetblue", "lufthansa", "air", "france",
    "british", "airways", "emirates",
    // food
    "mcdonalds", "subway", "dominos", "pizza", "hut", "taco", "bell", "kfc", "burger", "king",
    "wendys",
    // logistics
    "fedex", "ups", "dhl", "usps", "logistics", "maersk", "cosco", "evergreen", "hapag",
    "lloyd", "msc",
];

/// Substrings that mark a legal entity or corporate suffix.
pub const LEGAL_INDICATORS: &[&str] = &[
    "ltd", "limited", "inc", "incorporated", "corp", "corporation", "llc", "plc", "pty",
    "gmbh", "sa", "bv", "nv", "srl", "spa", "ag", "co", "company", "group", "holdings",
    "enterprises", "solutions", "services", "systems", "technologies", "international",
    "global",
];

pub const INDUSTRY_TERMS: &[(&str, &[&str])] = &[
    (
        "Construction",
        &[
            "contractor", "subcontractor", "supplier", "vendor", "architect", "engineer",
            "surveyor", "construction", "building", "development", "infrastructure",
            "renovation", "maintenance", "concrete", "steel", "timber", "materials", "equipment",
            "machinery", "tools", "safety", "compliance", "permits", "inspections",
            "certifications",
        ],
    ),
    (
        "Technology",
        &[
            "software", "hardware", "technology", "digital", "tech", "innovation", "solutions",
            "platform", "application", "system", "network", "cloud", "data", "analytics",
            "artificial", "intelligence", "machine", "learning", "automation", "integration",
        ],
    ),
    (
        "Finance",
        &[
            "financial", "banking", "investment", "insurance", "accounting", "audit", "tax",
            "capital", "funding", "loan", "mortgage", "credit", "payment", "transaction",
            "portfolio", "asset", "liability", "equity", "revenue", "expense", "budget",
        ],
    ),
    (
        "Healthcare",
        &[
            "medical", "health", "hospital", "clinic", "pharmacy", "healthcare", "patient",
            "treatment", "diagnosis", "therapy", "medicine", "pharmaceutical", "research",
            "clinical", "surgical", "nursing", "care", "wellness", "rehabilitation",
        ],
    ),
    (
        "Education",
        &[
            "school", "university", "college", "education", "training", "learning", "teaching",
            "student", "academic", "research", "curriculum", "course", "program", "degree",
            "certification", "knowledge", "skills", "development", "scholarship",
        ],
    ),
    (
        "Retail",
        &[
            "retail", "store", "shop", "market", "sales", "customer", "product", "service",
            "brand", "merchandise", "inventory", "supply", "distribution", "logistics",
            "marketing", "advertising", "promotion", "discount", "price", "purchase",
        ],
    ),
];
